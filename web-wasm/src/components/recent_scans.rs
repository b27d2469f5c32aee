//! 受付履歴リスト（新しい順）

use checkin_common::{format_date, RecentScan};
use leptos::prelude::*;

#[component]
pub fn RecentScans(
    scans: Signal<Vec<RecentScan>>,
    #[prop(default = "No recent scans")] empty_text: &'static str,
) -> impl IntoView {
    view! {
        <div class="recent-scans">
            <Show
                when=move || !scans.get().is_empty()
                fallback=move || view! { <p class="text-muted">{empty_text}</p> }
            >
                <For
                    each=move || scans.get()
                    key=|scan| scan.prn.clone()
                    children=move |scan| {
                        view! {
                            <div class="scan-item">
                                <div>
                                    <div class="scan-name">{scan.name.clone()}</div>
                                    <small class="text-muted">"PRN: " {scan.prn.clone()}</small>
                                </div>
                                <div class="scan-item-right">
                                    <span class="badge badge-success">"Scanned"</span>
                                    <small class="text-muted">{format_date(&scan.scanned_at)}</small>
                                </div>
                            </div>
                        }
                    }
                />
            </Show>
        </div>
    }
}
