//! 集計カード（合計・受付済み・未受付・完了率）

use checkin_common::{format_number, ScanStats};
use leptos::prelude::*;

#[component]
pub fn StatCards(stats: Signal<Option<ScanStats>>) -> impl IntoView {
    let total = move || {
        stats
            .get()
            .map(|s| format_number(s.total_students))
            .unwrap_or_else(|| "-".to_string())
    };
    let scanned = move || {
        stats
            .get()
            .map(|s| format_number(s.scanned_count))
            .unwrap_or_else(|| "-".to_string())
    };
    let pending = move || {
        stats
            .get()
            .map(|s| format_number(s.pending_count))
            .unwrap_or_else(|| "-".to_string())
    };
    let rate = move || {
        stats
            .get()
            .map(|s| format!("{}%", s.scan_percentage))
            .unwrap_or_else(|| "-".to_string())
    };

    view! {
        <div class="stat-cards">
            <div class="stat-card">
                <div class="stat-value text-primary">{total}</div>
                <div class="stat-label">"Total Students"</div>
            </div>
            <div class="stat-card">
                <div class="stat-value text-success">{scanned}</div>
                <div class="stat-label">"Scanned"</div>
            </div>
            <div class="stat-card">
                <div class="stat-value text-warning">{pending}</div>
                <div class="stat-label">"Pending"</div>
            </div>
            <div class="stat-card">
                <div class="stat-value text-info">{rate}</div>
                <div class="stat-label">"Completion"</div>
            </div>
        </div>
    }
}
