//! スキャナページ
//!
//! カメラ映像からのQR読み取り・手入力検証・受付状況の表示。
//! 読み取りループの状態はScannerControllerに集約し、
//! 各イベントハンドラへはRc<RefCell<_>>で渡す

use std::cell::RefCell;
use std::rc::Rc;

use checkin_common::{
    extract_qr_hash, format_number, DashboardSnapshot, RecentScan, ScanStats, ValidateRequest,
    ValidateResponse,
};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

use crate::api;
use crate::components::header::Header;
use crate::components::recent_scans::RecentScans;
use crate::components::toast::{ToastHost, Toasts};
use crate::refresh::PeriodicRefresh;
use crate::scan::{camera, start_frame_loop, ScanPhase, ScannerController};

/// 集計・履歴それぞれの自動更新間隔
const STATS_REFRESH_MS: u32 = 10_000;
const HISTORY_REFRESH_MS: u32 = 15_000;

/// 検証後にスキャンを再開するまでの待ち時間
const RESUME_DELAY_MS: u32 = 2_000;
/// 検証結果の表示時間
const FEEDBACK_MS: u32 = 5_000;
/// カメラ切替時に再起動するまでの待ち時間
const SWITCH_DELAY_MS: u32 = 500;

/// 検証結果の表示内容（1回の検証の間だけ生きる）
#[derive(Debug, Clone, PartialEq)]
enum ScanFeedback {
    Success {
        name: String,
        prn: String,
        email: String,
    },
    Failure {
        message: String,
    },
}

type DecodedHandler = Rc<dyn Fn(String)>;

#[component]
pub fn ScannerPage() -> impl IntoView {
    let toasts = Toasts::new();

    let (phase, set_phase) = signal(ScanPhase::Idle);
    let (camera_error, set_camera_error) = signal(false);
    let (multiple_cameras, set_multiple_cameras) = signal(false);
    let (feedback, set_feedback) = signal(None::<ScanFeedback>);
    let (stats, set_stats) = signal(None::<ScanStats>);
    let (history, set_history) = signal(Vec::<RecentScan>::new());
    let (manual_input, set_manual_input) = signal(String::new());

    let video_ref = NodeRef::<leptos::html::Video>::new();
    let ctrl = Rc::new(RefCell::new(ScannerController::new()));

    let load_stats = move || {
        spawn_local(async move {
            match api::get_json::<DashboardSnapshot>(api::API_DASHBOARD_STATS).await {
                Ok(snapshot) => set_stats.set(Some(snapshot.stats)),
                Err(e) => web_sys::console::error_1(&JsValue::from_str(&format!(
                    "Failed to load scan stats: {}",
                    e
                ))),
            }
        });
    };
    let load_history = move || {
        spawn_local(async move {
            match api::get_json::<DashboardSnapshot>(api::API_DASHBOARD_STATS).await {
                Ok(snapshot) => set_history.set(snapshot.recent_scans),
                Err(e) => web_sys::console::error_1(&JsValue::from_str(&format!(
                    "Failed to load scan history: {}",
                    e
                ))),
            }
        });
    };

    load_stats();
    load_history();
    let mut stats_refresh = PeriodicRefresh::new(STATS_REFRESH_MS, move || load_stats());
    stats_refresh.start();
    stats_refresh.forget();
    let mut history_refresh = PeriodicRefresh::new(HISTORY_REFRESH_MS, move || load_history());
    history_refresh.start();
    history_refresh.forget();

    // デコード→検証→再開が循環参照になるため、デコードハンドラは
    // スロット越しに参照する
    let on_decoded_slot: Rc<RefCell<Option<DecodedHandler>>> = Rc::new(RefCell::new(None));

    // 正規化して検証エンドポイントへ送り、結果を描画する。
    // カメラ経由（resume=true）は検証後にフレームループを再開する
    let submit_code: Rc<dyn Fn(String, bool)> = {
        let ctrl = ctrl.clone();
        let slot = on_decoded_slot.clone();
        Rc::new(move |raw: String, resume: bool| {
            let ctrl = ctrl.clone();
            let slot = slot.clone();
            spawn_local(async move {
                let request = ValidateRequest {
                    qr_hash: extract_qr_hash(&raw),
                };
                let result =
                    api::post_json::<ValidateResponse, _>(api::API_VALIDATE_QR, &request).await;

                match result {
                    Ok(resp) if resp.valid => {
                        let student = resp.student.unwrap_or_default();
                        toasts.success(format!("Successfully scanned: {}", student.name));
                        set_feedback.set(Some(ScanFeedback::Success {
                            name: student.name,
                            prn: student.prn,
                            email: student.email,
                        }));
                        load_stats();
                        load_history();
                    }
                    Ok(resp) => {
                        let message = resp
                            .message
                            .unwrap_or_else(|| "Invalid or already used QR code".to_string());
                        toasts.error(message.clone());
                        set_feedback.set(Some(ScanFeedback::Failure { message }));
                    }
                    Err(e) => {
                        let message = e.to_string();
                        toasts.error(message.clone());
                        set_feedback.set(Some(ScanFeedback::Failure { message }));
                    }
                }

                // 結果表示を一定時間で待機表示へ戻す
                Timeout::new(FEEDBACK_MS, move || set_feedback.set(None)).forget();

                if resume {
                    Timeout::new(RESUME_DELAY_MS, move || {
                        if ctrl.borrow_mut().resume_after_validation() {
                            set_phase.set(ScanPhase::Scanning);
                            if let Some(on_decoded) = slot.borrow().clone() {
                                start_frame_loop(ctrl.clone(), on_decoded);
                            }
                        }
                    })
                    .forget();
                }
            });
        })
    };

    {
        let submit_code = submit_code.clone();
        let on_decoded: DecodedHandler = Rc::new(move |payload: String| {
            // ループはstep側で停止済み。UI状態だけ合わせて検証に回す
            set_phase.set(ScanPhase::Validating);
            submit_code(payload, true);
        });
        *on_decoded_slot.borrow_mut() = Some(on_decoded);
    }

    // カメラを開いてフレームループを開始する
    let begin_scan: Rc<dyn Fn()> = {
        let ctrl = ctrl.clone();
        let slot = on_decoded_slot.clone();
        Rc::new(move || {
            if ctrl.borrow().phase != ScanPhase::Idle {
                return;
            }
            let ctrl = ctrl.clone();
            let slot = slot.clone();
            spawn_local(async move {
                // デバイス一覧は開始のたびに取り直す
                let devices = camera::enumerate_video_inputs().await.unwrap_or_default();
                let device_id = {
                    let mut c = ctrl.borrow_mut();
                    c.camera.set_cameras(devices);
                    set_multiple_cameras.set(c.camera.camera_count() > 1);
                    c.camera.selected_device_id()
                };

                match camera::open_stream(device_id.as_deref()).await {
                    Ok(stream) => {
                        let Some(video) = video_ref.get_untracked() else {
                            return;
                        };
                        video.set_src_object(Some(&stream));
                        {
                            let mut c = ctrl.borrow_mut();
                            c.camera.store_stream(stream);
                            c.attach_video(video);
                            c.mark_scanning();
                        }
                        set_camera_error.set(false);
                        set_phase.set(ScanPhase::Scanning);
                        if let Some(on_decoded) = slot.borrow().clone() {
                            start_frame_loop(ctrl.clone(), on_decoded);
                        }
                        toasts.success("Scanner started successfully");
                    }
                    Err(e) => {
                        web_sys::console::error_1(&JsValue::from_str(&format!(
                            "Error starting scanner: {}",
                            e
                        )));
                        set_camera_error.set(true);
                        toasts.error("Failed to access camera");
                    }
                }
            });
        })
    };

    // ループとカメラを止めてIdleへ戻す
    let halt_scan: Rc<dyn Fn()> = {
        let ctrl = ctrl.clone();
        Rc::new(move || {
            ctrl.borrow_mut().stop();
            if let Some(video) = video_ref.get_untracked() {
                video.set_src_object(None);
            }
            set_phase.set(ScanPhase::Idle);
        })
    };

    let on_stop = {
        let halt_scan = halt_scan.clone();
        move |_| {
            halt_scan();
            toasts.info("Scanner stopped");
        }
    };

    let on_switch_camera = {
        let ctrl = ctrl.clone();
        let halt_scan = halt_scan.clone();
        let begin_scan = begin_scan.clone();
        move |_| {
            let was_active = {
                let mut c = ctrl.borrow_mut();
                if c.camera.camera_count() <= 1 {
                    return;
                }
                c.camera.advance();
                c.phase != ScanPhase::Idle
            };
            if was_active {
                halt_scan();
                let begin_scan = begin_scan.clone();
                // 新しいデバイスで開き直すまで少し待つ
                Timeout::new(SWITCH_DELAY_MS, move || begin_scan()).forget();
            }
        }
    };

    // タブ非表示中はデコードを止める。ストリームは保持したままなので、
    // 表示に戻ったらループだけ再開する
    {
        let ctrl = ctrl.clone();
        let slot = on_decoded_slot.clone();
        let document = web_sys::window().unwrap().document().unwrap();
        let target = document.clone();
        let listener = EventListener::new(&target, "visibilitychange", move |_| {
            if document.hidden() {
                let mut c = ctrl.borrow_mut();
                if c.phase == ScanPhase::Scanning {
                    c.suspend_loop();
                }
            } else {
                let should_resume = {
                    let c = ctrl.borrow();
                    c.phase == ScanPhase::Scanning && c.camera.has_stream() && !c.is_loop_active()
                };
                if should_resume {
                    if let Some(on_decoded) = slot.borrow().clone() {
                        start_frame_loop(ctrl.clone(), on_decoded);
                    }
                }
            }
        });
        listener.forget();
    }

    // ページ離脱前にカメラを解放する
    {
        let ctrl = ctrl.clone();
        let window = web_sys::window().unwrap();
        let listener = EventListener::new(&window, "beforeunload", move |_| {
            ctrl.borrow_mut().stop();
        });
        listener.forget();
    }

    // 手入力はカメラを介さず同じ検証・描画を通る
    let on_manual_submit = {
        let submit_code = submit_code.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let value = manual_input.get_untracked().trim().to_string();
            if value.is_empty() {
                toasts.warning("Please enter a QR code hash or URL");
                return;
            }
            submit_code(value, false);
            set_manual_input.set(String::new());
        }
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

    let on_start = {
        let begin_scan = begin_scan.clone();
        move |_| begin_scan()
    };

    view! {
        <div class="container scanner-page">
            <Header active="scanner"/>
            <ToastHost toasts=toasts/>

            <div class="scanner-grid">
                <section class="card scanner-card">
                    <h2>"QR Scanner"</h2>

                    <div
                        class="scanner-status"
                        style:display=move || {
                            if phase.get() == ScanPhase::Idle { "block" } else { "none" }
                        }
                    >
                        <p class="text-muted">"Camera is off"</p>
                        <button class="btn btn-primary" on:click=on_start>
                            "Start Scanner"
                        </button>
                    </div>

                    <div
                        class="camera-error alert alert-danger"
                        style:display=move || if camera_error.get() { "block" } else { "none" }
                    >
                        "Unable to access the camera. Check browser permissions and try again."
                    </div>

                    <div
                        class="scanner-container"
                        style:display=move || {
                            if phase.get() == ScanPhase::Idle { "none" } else { "block" }
                        }
                    >
                        <video
                            node_ref=video_ref
                            class="scanner-video"
                            autoplay=true
                            playsinline=true
                            muted=true
                        ></video>
                        <div
                            class="scanner-overlay"
                            class:validating=move || phase.get() == ScanPhase::Validating
                        ></div>
                    </div>

                    <div
                        class="scanner-controls"
                        style:display=move || {
                            if phase.get() == ScanPhase::Idle { "none" } else { "block" }
                        }
                    >
                        <button class="btn btn-secondary" on:click=on_stop>"Stop"</button>
                        <button
                            class="btn btn-secondary"
                            style:display=move || {
                                if multiple_cameras.get() { "inline-block" } else { "none" }
                            }
                            on:click=on_switch_camera
                        >
                            "Switch Camera"
                        </button>
                    </div>

                    {move || match feedback.get() {
                        Some(ScanFeedback::Success { name, prn, email }) => view! {
                            <div class="scan-result success">
                                <h5 class="text-success">"Scan Successful!"</h5>
                                <div class="fw-bold">{name}</div>
                                <div class="text-muted">"PRN: " {prn}</div>
                                <div class="text-muted">{email}</div>
                                <span class="badge badge-success">"Attendance Recorded"</span>
                            </div>
                        }
                        .into_any(),
                        Some(ScanFeedback::Failure { message }) => view! {
                            <div class="scan-result failure">
                                <h5 class="text-danger">"Scan Failed"</h5>
                                <p class="text-muted">{message}</p>
                            </div>
                        }
                        .into_any(),
                        None => view! {
                            <div class="scan-result idle">
                                <p class="text-muted">"Ready to scan QR codes"</p>
                            </div>
                        }
                        .into_any(),
                    }}

                    <form class="manual-form" on:submit=on_manual_submit>
                        <input
                            type="text"
                            placeholder="QR hash or URL"
                            prop:value=move || manual_input.get()
                            on:input=move |ev| set_manual_input.set(event_target_value(&ev))
                        />
                        <button type="submit" class="btn btn-primary">"Validate"</button>
                    </form>
                </section>

                <section class="card">
                    <h2>"Today"</h2>
                    <div class="scan-stats">
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
                            <div class="stat-label">"Scan Rate"</div>
                        </div>
                    </div>

                    <div class="history-header">
                        <h2>"Recent Scans"</h2>
                        <button
                            class="btn btn-small btn-secondary"
                            on:click=move |_| load_history()
                        >
                            "Refresh"
                        </button>
                    </div>
                    <RecentScans
                        scans=Signal::derive(move || history.get())
                        empty_text="No scans yet today"
                    />
                </section>
            </div>
        </div>
    }
}
