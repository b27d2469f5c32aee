//! QRキャプチャ・デコードループ
//!
//! requestAnimationFrameで毎フレーム映像をデコード面に写し、
//! 外部デコーダに渡す。QRが見つかるとループを止めて検証に回し、
//! 検証後に呼び出し側が再開する

pub mod camera;
pub mod qr_bridge;

use gloo::render::{request_animation_frame, AnimationFrame};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

pub use camera::CameraController;

/// スキャナの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// カメラ停止中
    Idle,
    /// フレームループ動作中
    Scanning,
    /// デコード結果を検証中（ループは停止）
    Validating,
}

impl ScanPhase {
    /// フレームをデコードしてよい状態か
    pub fn can_decode(&self) -> bool {
        matches!(self, ScanPhase::Scanning)
    }
}

/// カメラ・デコード面・フレームループの所有者
///
/// ページ側でRc<RefCell<_>>に包み、各イベントハンドラへ参照で渡す
pub struct ScannerController {
    pub camera: CameraController,
    pub phase: ScanPhase,
    video: Option<HtmlVideoElement>,
    surface: Option<(HtmlCanvasElement, CanvasRenderingContext2d)>,
    raf: Option<AnimationFrame>,
}

impl ScannerController {
    pub fn new() -> Self {
        Self {
            camera: CameraController::new(),
            phase: ScanPhase::Idle,
            video: None,
            surface: None,
            raf: None,
        }
    }

    /// デコード元になるvideo要素を紐付ける
    pub fn attach_video(&mut self, video: HtmlVideoElement) {
        self.video = Some(video);
    }

    /// ストリーム取得成功後に呼ぶ
    pub fn mark_scanning(&mut self) {
        self.phase = ScanPhase::Scanning;
    }

    /// 検証後の再開
    ///
    /// フィードバック表示中にstopされた場合はIdleが勝つため、
    /// Validatingのままストリームを保持しているときだけ再開する
    pub fn resume_after_validation(&mut self) -> bool {
        if self.phase == ScanPhase::Validating && self.camera.has_stream() {
            self.phase = ScanPhase::Scanning;
            true
        } else {
            false
        }
    }

    /// ループとカメラを完全に止める
    pub fn stop(&mut self) {
        self.phase = ScanPhase::Idle;
        self.raf = None;
        self.camera.close();
    }

    /// フレームループだけ止める（タブ非表示時。ストリームは保持）
    pub fn suspend_loop(&mut self) {
        self.raf = None;
    }

    pub fn is_loop_active(&self) -> bool {
        self.raf.is_some()
    }

    /// 現在のフレームをデコード面に写してQRを探す
    ///
    /// 映像の準備ができていない間はNone（呼び出し側が次フレームを予約する）
    fn decode_current_frame(&mut self) -> Option<String> {
        let video = self.video.clone()?;
        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            return None;
        }

        let (canvas, ctx) = self.decode_surface()?;
        if canvas.width() != width || canvas.height() != height {
            canvas.set_width(width);
            canvas.set_height(height);
        }

        ctx.draw_image_with_html_video_element(&video, 0.0, 0.0)
            .ok()?;
        let image = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?;
        let data = image.data();
        qr_bridge::decode_qr_js(&data, width, height)
    }

    /// 画面外のデコード面（遅延生成）
    fn decode_surface(&mut self) -> Option<&(HtmlCanvasElement, CanvasRenderingContext2d)> {
        if self.surface.is_none() {
            let document = web_sys::window()?.document()?;
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .ok()?
                .dyn_into()
                .ok()?;
            let ctx: CanvasRenderingContext2d =
                canvas.get_context("2d").ok()??.dyn_into().ok()?;
            self.surface = Some((canvas, ctx));
        }
        self.surface.as_ref()
    }
}

/// フレームループを開始する
///
/// デコード結果は`on_decoded`に渡される。その時点でコントローラは
/// Validatingに移行しループは止まっている
pub fn start_frame_loop(ctrl: Rc<RefCell<ScannerController>>, on_decoded: Rc<dyn Fn(String)>) {
    schedule_frame(ctrl, on_decoded);
}

fn schedule_frame(ctrl: Rc<RefCell<ScannerController>>, on_decoded: Rc<dyn Fn(String)>) {
    let handle = {
        let ctrl = ctrl.clone();
        let on_decoded = on_decoded.clone();
        request_animation_frame(move |_| step_frame(ctrl, on_decoded))
    };
    ctrl.borrow_mut().raf = Some(handle);
}

fn step_frame(ctrl: Rc<RefCell<ScannerController>>, on_decoded: Rc<dyn Fn(String)>) {
    let decoded = {
        let mut c = ctrl.borrow_mut();
        if !c.phase.can_decode() {
            c.raf = None;
            return;
        }
        c.decode_current_frame()
    };

    match decoded {
        Some(payload) => {
            // 多重スキャン防止のため、検証が終わるまで予約しない
            {
                let mut c = ctrl.borrow_mut();
                c.phase = ScanPhase::Validating;
                c.raf = None;
            }
            on_decoded(payload);
        }
        None => schedule_frame(ctrl, on_decoded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase_is_idle() {
        let controller = ScannerController::new();
        assert_eq!(controller.phase, ScanPhase::Idle);
        assert!(!controller.is_loop_active());
    }

    #[test]
    fn test_mark_scanning() {
        let mut controller = ScannerController::new();
        controller.mark_scanning();
        assert_eq!(controller.phase, ScanPhase::Scanning);
        assert!(controller.phase.can_decode());
    }

    #[test]
    fn test_stop_returns_to_idle() {
        let mut controller = ScannerController::new();
        controller.mark_scanning();
        controller.stop();
        assert_eq!(controller.phase, ScanPhase::Idle);
        assert!(!controller.phase.can_decode());
    }

    #[test]
    fn test_resume_requires_validating_with_stream() {
        // stop済み（Idle）やストリーム未保持では再開しない
        let mut controller = ScannerController::new();
        controller.phase = ScanPhase::Validating;
        assert!(!controller.resume_after_validation());
        assert_eq!(controller.phase, ScanPhase::Validating);

        controller.stop();
        assert!(!controller.resume_after_validation());
        assert_eq!(controller.phase, ScanPhase::Idle);
    }

    #[test]
    fn test_validating_does_not_decode() {
        assert!(!ScanPhase::Validating.can_decode());
        assert!(!ScanPhase::Idle.can_decode());
        assert!(ScanPhase::Scanning.can_decode());
    }

    #[test]
    fn test_suspend_keeps_phase() {
        let mut controller = ScannerController::new();
        controller.mark_scanning();
        controller.suspend_loop();
        assert_eq!(controller.phase, ScanPhase::Scanning);
        assert!(!controller.is_loop_active());
    }
}
