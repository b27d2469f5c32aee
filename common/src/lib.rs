//! Check-in Common Library
//!
//! Web(WASM)フロントエンドの各ページコントローラで共有される型とユーティリティ

pub mod error;
pub mod filter;
pub mod format;
pub mod guard;
pub mod qr;
pub mod types;

pub use error::{Error, Result};
pub use filter::filter_students;
pub use format::{format_date, format_number};
pub use guard::{confirmation_matches, is_supported_roster_file, CLEAR_CONFIRMATION};
pub use qr::extract_qr_hash;
pub use types::{
    ClearCounts, ClearRequest, ClearResponse, DashboardSnapshot, ErrorBody, MessageResponse,
    RecentScan, ScanStats, ScanStatus, ScannedStudent, Student, ValidateRequest, ValidateResponse,
};
