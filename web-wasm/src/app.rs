//! ページ振り分け
//!
//! サーバ側ルーティング（/admin /dashboard /scanner）に合わせて、
//! URLパスごとに独立したページコントローラをマウントする。
//! ページ同士は互いを呼び出さない

use crate::pages::{AdminPage, DashboardPage, ScannerPage};

/// マウント対象のページ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Admin,
    Dashboard,
    Scanner,
}

impl Page {
    /// URLパスから対象ページを決める（未知のパスはダッシュボード）
    pub fn for_path(path: &str) -> Page {
        match path.trim_end_matches('/') {
            "/admin" => Page::Admin,
            "/scanner" => Page::Scanner,
            _ => Page::Dashboard,
        }
    }
}

pub fn mount(path: &str) {
    match Page::for_path(path) {
        Page::Admin => {
            leptos::mount::mount_to_body(AdminPage);
        }
        Page::Dashboard => {
            leptos::mount::mount_to_body(DashboardPage);
        }
        Page::Scanner => {
            leptos::mount::mount_to_body(ScannerPage);
        }
    }
}
