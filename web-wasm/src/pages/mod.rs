//! ページコントローラ
//!
//! 各ページは独立しており、互いを呼び出さない。データの流れは常に
//! ページ → APIユーティリティ → サーバ → JSON → ページ → 描画

pub mod admin;
pub mod dashboard;
pub mod scanner;

pub use admin::AdminPage;
pub use dashboard::DashboardPage;
pub use scanner::ScannerPage;
