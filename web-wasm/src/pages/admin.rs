//! 管理ページ
//!
//! 名簿アップロード・QR生成・メール送信・全データ削除をAPIに繋ぐ。
//! どの操作も「ボタン無効化→API1回→成功通知+ステータス更新/失敗通知→
//! ボタン復帰」の同じ型で動く

use checkin_common::{
    confirmation_matches, is_supported_roster_file, ClearRequest, ClearResponse,
    DashboardSnapshot, MessageResponse,
};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use crate::api;
use crate::components::header::Header;
use crate::components::progress_bar::ProgressBar;
use crate::components::recent_scans::RecentScans;
use crate::components::stat_cards::StatCards;
use crate::components::toast::{ToastHost, Toasts};
use crate::refresh::PeriodicRefresh;

/// ステータス自動更新の間隔
const STATUS_REFRESH_MS: u32 = 30_000;

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let toasts = Toasts::new();

    let (status, set_status) = signal(None::<DashboardSnapshot>);
    let (status_error, set_status_error) = signal(false);
    let (uploading, set_uploading) = signal(false);
    let (upload_progress, set_upload_progress) = signal(0.0f64);
    let (generating, set_generating) = signal(false);
    let (sending, set_sending) = signal(false);
    let (clearing, set_clearing) = signal(false);
    let (show_clear_modal, set_show_clear_modal) = signal(false);
    let (show_email_modal, set_show_email_modal) = signal(false);
    let (confirmation, set_confirmation) = signal(String::new());

    let file_input_ref = NodeRef::<leptos::html::Input>::new();

    let load_status = move || {
        spawn_local(async move {
            match api::get_json::<DashboardSnapshot>(api::API_DASHBOARD_STATS).await {
                Ok(snapshot) => {
                    set_status.set(Some(snapshot));
                    set_status_error.set(false);
                }
                Err(e) => {
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "Failed to load system status: {}",
                        e
                    )));
                    set_status_error.set(true);
                }
            }
        });
    };

    load_status();
    let mut status_refresh = PeriodicRefresh::new(STATUS_REFRESH_MS, move || load_status());
    status_refresh.start();
    status_refresh.forget();

    // 名簿アップロード
    let on_upload = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(input) = file_input_ref.get_untracked() else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            toasts.warning("Please select a file");
            return;
        };
        if !is_supported_roster_file(&file.name()) {
            toasts.error("Please select an Excel or CSV file");
            return;
        }

        set_uploading.set(true);
        set_upload_progress.set(0.0);
        spawn_local(async move {
            let result = api::upload::upload_file(api::API_UPLOAD_STUDENTS, &file, move |p| {
                set_upload_progress.set(p);
            })
            .await;

            match result {
                Ok(resp) => {
                    toasts.success(resp.message);
                    input.set_value("");
                    load_status();
                }
                Err(e) => toasts.error(e.to_string()),
            }
            set_uploading.set(false);
        });
    };

    // QRコード生成
    let on_generate = move |_| {
        set_generating.set(true);
        spawn_local(async move {
            match api::post_empty::<MessageResponse>(api::API_GENERATE_QR_CODES).await {
                Ok(resp) => {
                    toasts.success(resp.message);
                    load_status();
                }
                Err(e) => toasts.error(e.to_string()),
            }
            set_generating.set(false);
        });
    };

    // メール一括送信
    let on_send_emails = move |_| {
        if !confirm(
            "Are you sure you want to send emails to all students? This action cannot be undone.",
        ) {
            return;
        }

        set_sending.set(true);
        spawn_local(async move {
            match api::post_empty::<MessageResponse>(api::API_SEND_EMAILS).await {
                Ok(resp) => {
                    toasts.success(resp.message);
                    load_status();
                }
                Err(e) => {
                    let message = e.to_string();
                    // サーバは構造化コードを返さないため、設定ダイアログを
                    // 開くかどうかを文言への部分一致で判定している
                    if message.contains("Email configuration") {
                        set_show_email_modal.set(true);
                    }
                    toasts.error(message);
                }
            }
            set_sending.set(false);
        });
    };

    let on_refresh_status = move |_| {
        load_status();
        toasts.info("Status refreshed");
    };

    // 全データ削除（確認フレーズ完全一致 + 確認ダイアログの二段構え）
    let on_confirm_clear = move |_| {
        let value = confirmation.get_untracked();
        if !confirmation_matches(&value) {
            toasts.error("Invalid confirmation text");
            return;
        }
        if !confirm("Are you absolutely sure you want to delete ALL data? This action cannot be undone!") {
            return;
        }

        set_clearing.set(true);
        spawn_local(async move {
            let request = ClearRequest {
                confirmation: value,
            };
            match api::post_json::<ClearResponse, _>(api::API_CLEAR_ALL_DATA, &request).await {
                Ok(resp) if resp.success => {
                    toasts.success(
                        resp.message
                            .unwrap_or_else(|| "All data cleared".to_string()),
                    );
                    set_show_clear_modal.set(false);
                    set_confirmation.set(String::new());
                    load_status();

                    if let Some(cleared) = resp.cleared {
                        // 件数の内訳は1秒遅れで知らせる
                        Timeout::new(1_000, move || {
                            toasts.info(format!(
                                "Cleared: {} students, {} scans, QR files, and uploads",
                                cleared.students, cleared.scans
                            ));
                        })
                        .forget();
                    }
                }
                Ok(resp) => {
                    toasts.error(
                        resp.error
                            .unwrap_or_else(|| "Failed to clear data".to_string()),
                    );
                }
                Err(e) => toasts.error(e.to_string()),
            }
            set_clearing.set(false);
        });
    };

    let close_clear_modal = move |_| {
        set_show_clear_modal.set(false);
        set_confirmation.set(String::new());
    };

    view! {
        <div class="container admin-page">
            <Header active="admin"/>
            <ToastHost toasts=toasts/>

            <div class="admin-grid">
                <form class="card" on:submit=on_upload>
                    <h2>"Upload Student Roster"</h2>
                    <p class="text-muted">"Accepted formats: .xlsx, .xls, .csv"</p>
                    <input type="file" node_ref=file_input_ref accept=".xlsx,.xls,.csv"/>
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || uploading.get()
                    >
                        {move || if uploading.get() { "Uploading..." } else { "Upload Students" }}
                    </button>
                    <Show when=move || uploading.get()>
                        <ProgressBar progress=upload_progress label="Uploading..."/>
                    </Show>
                </form>

                <section class="card">
                    <h2>"QR Codes"</h2>
                    <p class="text-muted">"Generate a QR code for every uploaded student."</p>
                    <button
                        class="btn btn-primary"
                        disabled=move || generating.get()
                        on:click=on_generate
                    >
                        {move || if generating.get() { "Generating..." } else { "Generate QR Codes" }}
                    </button>
                </section>

                <section class="card">
                    <h2>"Emails"</h2>
                    <p class="text-muted">"Send each student their personal QR code."</p>
                    <button
                        class="btn btn-primary"
                        disabled=move || sending.get()
                        on:click=on_send_emails
                    >
                        {move || if sending.get() { "Sending..." } else { "Send Emails" }}
                    </button>
                </section>

                <section class="card">
                    <h2>"System Status"</h2>
                    <Show
                        when=move || !status_error.get()
                        fallback=|| view! {
                            <div class="alert alert-danger">"Failed to load system status"</div>
                        }
                    >
                        <StatCards stats=Signal::derive(move || status.get().map(|s| s.stats))/>
                        <div class="progress">
                            <div
                                class="progress-fill"
                                style=move || format!(
                                    "width: {}%",
                                    status.get().map(|s| s.stats.scan_percentage).unwrap_or(0.0)
                                )
                            />
                        </div>
                    </Show>
                    <button class="btn btn-secondary btn-small" on:click=on_refresh_status>
                        "Refresh Status"
                    </button>

                    <h3>"Recent Activity"</h3>
                    <RecentScans
                        scans=Signal::derive(move || {
                            status.get().map(|s| s.recent_scans).unwrap_or_default()
                        })
                        empty_text="No recent activity"
                    />
                </section>

                <section class="card danger-zone">
                    <h2 class="text-danger">"Danger Zone"</h2>
                    <p class="text-muted">
                        "Deletes every student, scan, generated QR code and upload."
                    </p>
                    <button
                        class="btn btn-danger"
                        on:click=move |_| set_show_clear_modal.set(true)
                    >
                        "Clear All Data"
                    </button>
                </section>
            </div>

            // 全データ削除モーダル
            <Show when=move || show_clear_modal.get()>
                <div class="modal-overlay" on:click=close_clear_modal>
                    <div class="modal-dialog" on:click=move |ev| ev.stop_propagation()>
                        <h3 class="modal-title text-danger">"Clear All Data"</h3>
                        <p>
                            "This permanently deletes all students and scans. Type "
                            <code>"CLEAR_ALL_DATA"</code>
                            " to enable the delete button."
                        </p>
                        <input
                            type="text"
                            class="confirmation-input"
                            placeholder="CLEAR_ALL_DATA"
                            prop:value=move || confirmation.get()
                            on:input=move |ev| set_confirmation.set(event_target_value(&ev))
                        />
                        <div class="modal-buttons">
                            <button class="modal-button cancel" on:click=close_clear_modal>
                                "Cancel"
                            </button>
                            <button
                                class="modal-button danger"
                                disabled=move || {
                                    !confirmation_matches(&confirmation.get()) || clearing.get()
                                }
                                on:click=on_confirm_clear
                            >
                                {move || if clearing.get() { "Deleting..." } else { "Delete All Data" }}
                            </button>
                        </div>
                    </div>
                </div>
            </Show>

            // メール設定案内モーダル
            <Show when=move || show_email_modal.get()>
                <div class="modal-overlay" on:click=move |_| set_show_email_modal.set(false)>
                    <div class="modal-dialog" on:click=move |ev| ev.stop_propagation()>
                        <h3 class="modal-title">"Email Configuration Required"</h3>
                        <p>
                            "The server has no SMTP credentials configured. Set the mail "
                            "environment variables and restart the service before sending."
                        </p>
                        <div class="modal-buttons">
                            <button
                                class="modal-button"
                                on:click=move |_| set_show_email_modal.set(false)
                            >
                                "Close"
                            </button>
                        </div>
                    </div>
                </div>
            </Show>
        </div>
    }
}
