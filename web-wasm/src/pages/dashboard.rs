//! ダッシュボードページ
//!
//! 15秒ごとにスナップショットを取り直し、集計カード・チャート・
//! 受付履歴・学生テーブルを描画する。検索はクライアント側の
//! 絞り込みのみで再フェッチしない

use checkin_common::{filter_students, DashboardSnapshot, Error, Result};
use gloo::events::EventListener;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, HtmlAnchorElement, KeyboardEvent, Response, Url};

use crate::api;
use crate::chart;
use crate::components::header::Header;
use crate::components::recent_scans::RecentScans;
use crate::components::stat_cards::StatCards;
use crate::components::students_table::StudentsTable;
use crate::components::toast::{ToastHost, Toasts};
use crate::refresh::PeriodicRefresh;

/// スナップショット自動更新の間隔
const DASHBOARD_REFRESH_MS: u32 = 15_000;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let toasts = Toasts::new();

    let (snapshot, set_snapshot) = signal(None::<DashboardSnapshot>);
    let (query, set_query) = signal(String::new());

    let load_data = move || {
        spawn_local(async move {
            match api::get_json::<DashboardSnapshot>(api::API_DASHBOARD_STATS).await {
                Ok(data) => set_snapshot.set(Some(data)),
                Err(e) => {
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "Failed to load dashboard data: {}",
                        e
                    )));
                    toasts.error("Failed to load dashboard data");
                }
            }
        });
    };

    load_data();
    let mut dashboard_refresh = PeriodicRefresh::new(DASHBOARD_REFRESH_MS, move || load_data());
    dashboard_refresh.start();
    dashboard_refresh.forget();

    // チャートはスナップショットが替わるたびに差し替える
    Effect::new(move |_| {
        if let Some(snapshot) = snapshot.get() {
            chart::update_attendance_chart_js(
                "attendance-chart",
                snapshot.stats.scanned_count,
                snapshot.stats.pending_count,
            );
        }
    });

    let filtered = Signal::derive(move || {
        let students = snapshot
            .get()
            .map(|s| s.all_students)
            .unwrap_or_default();
        filter_students(&students, &query.get())
    });

    let count_label = move || {
        let total = snapshot
            .get()
            .map(|s| s.all_students.len())
            .unwrap_or(0);
        let shown = filtered.get().len();
        if total == 0 {
            "No students".to_string()
        } else if shown == total {
            format!("Showing {} students", total)
        } else {
            format!("Showing {} of {} students", shown, total)
        }
    };

    let export_data = move || {
        spawn_local(async move {
            match download_export().await {
                Ok(()) => toasts.success("Data exported successfully"),
                Err(e) => {
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "Export failed: {}",
                        e
                    )));
                    toasts.error("Failed to export data");
                }
            }
        });
    };

    let on_refresh = move |_| {
        load_data();
        toasts.info("Dashboard refreshed");
    };

    // タブに戻ってきたら即時更新
    {
        let document = web_sys::window().unwrap().document().unwrap();
        let target = document.clone();
        let listener = EventListener::new(&target, "visibilitychange", move |_| {
            if !document.hidden() {
                load_data();
            }
        });
        listener.forget();
    }

    // ショートカット: Ctrl/Cmd+R 更新, Ctrl/Cmd+E エクスポート, Esc 検索クリア
    {
        let document = web_sys::window().unwrap().document().unwrap();
        let listener = EventListener::new(&document, "keydown", move |event| {
            let Some(ev) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let command = ev.ctrl_key() || ev.meta_key();
            match ev.key().as_str() {
                "r" if command => {
                    ev.prevent_default();
                    load_data();
                    toasts.info("Dashboard refreshed");
                }
                "e" if command => {
                    ev.prevent_default();
                    export_data();
                }
                "Escape" => {
                    if !query.get_untracked().is_empty() {
                        set_query.set(String::new());
                    }
                }
                _ => {}
            }
        });
        listener.forget();
    }

    view! {
        <div class="container dashboard-page">
            <Header active="dashboard"/>
            <ToastHost toasts=toasts/>

            <div class="dashboard-toolbar">
                <button class="btn btn-secondary" on:click=on_refresh>"Refresh"</button>
                <button class="btn btn-primary" on:click=move |_| export_data()>
                    "Export Report"
                </button>
            </div>

            <StatCards stats=Signal::derive(move || snapshot.get().map(|s| s.stats))/>

            <div class="dashboard-grid">
                <section class="card chart-card">
                    <h2>"Attendance"</h2>
                    <canvas id="attendance-chart"></canvas>
                </section>

                <section class="card">
                    <h2>"Recent Scans"</h2>
                    <RecentScans
                        scans=Signal::derive(move || {
                            snapshot.get().map(|s| s.recent_scans).unwrap_or_default()
                        })
                    />
                </section>
            </div>

            <section class="card">
                <div class="table-header">
                    <h2>"Students"</h2>
                    <div class="search-box">
                        <input
                            type="text"
                            placeholder="Search by name, PRN, email or status"
                            prop:value=move || query.get()
                            on:input=move |ev| set_query.set(event_target_value(&ev))
                        />
                        <button
                            class="btn btn-small btn-secondary"
                            on:click=move |_| set_query.set(String::new())
                        >
                            "Clear"
                        </button>
                    </div>
                    <span class="student-count text-muted">{count_label}</span>
                </div>
                <StudentsTable students=filtered/>
            </section>
        </div>
    }
}

/// /api/export_data をBlobで受け取り、一時URL経由でダウンロードする
async fn download_export() -> Result<()> {
    let window = web_sys::window().ok_or_else(|| Error::Network("no window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_str(api::API_EXPORT_DATA))
        .await
        .map_err(|e| Error::Network(format!("{:?}", e)))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| Error::Network(format!("{:?}", e)))?;

    if !resp.ok() {
        return Err(Error::Api("Export failed".to_string()));
    }

    let blob: Blob = JsFuture::from(resp.blob().map_err(|e| Error::Network(format!("{:?}", e)))?)
        .await
        .map_err(|e| Error::Network(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| Error::Network(format!("{:?}", e)))?;

    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|e| Error::Network(format!("{:?}", e)))?;

    let document = window
        .document()
        .ok_or_else(|| Error::Network("no document".to_string()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| Error::Network(format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| Error::Network(format!("{:?}", e)))?;

    anchor.set_href(&url);
    anchor.set_download(&format!("student_scan_report_{}.xlsx", today_stamp()));

    let body = document
        .body()
        .ok_or_else(|| Error::Network("no body".to_string()))?;
    body.append_child(&anchor)
        .map_err(|e| Error::Network(format!("{:?}", e)))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| Error::Network(format!("{:?}", e)))?;
    let _ = Url::revoke_object_url(&url);

    Ok(())
}

/// ファイル名用のYYYY-MM-DD（toISOString準拠のUTC日付）
fn today_stamp() -> String {
    let iso = String::from(js_sys::Date::new_0().to_iso_string());
    iso.chars().take(10).collect()
}
