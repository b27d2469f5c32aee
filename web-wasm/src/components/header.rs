//! ページヘッダー（共通ナビゲーション）

use leptos::prelude::*;

#[component]
pub fn Header(active: &'static str) -> impl IntoView {
    let link = move |href: &'static str, key: &'static str, label: &'static str| {
        view! {
            <a href=href class="nav-link" class:active=move || active == key>
                {label}
            </a>
        }
    };

    view! {
        <header class="header">
            <h1>"Student Event Check-in"</h1>
            <nav class="nav">
                {link("/dashboard", "dashboard", "Dashboard")}
                {link("/scanner", "scanner", "Scanner")}
                {link("/admin", "admin", "Admin")}
            </nav>
        </header>
    }
}
