//! カメラデバイスとストリームの管理
//!
//! ストリームは同時に1本しか保持しない。停止・切替・ページ離脱時は
//! 必ず全トラックを停止してから手放す

use checkin_common::{Error, Result};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaDeviceInfo, MediaDeviceKind, MediaStream, MediaStreamConstraints};

fn camera_err(e: JsValue) -> Error {
    Error::Camera(format!("{:?}", e))
}

/// getUserMediaに渡すvideo制約
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    device_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    facing_mode: Option<String>,
    width: IdealDimension,
    height: IdealDimension,
}

#[derive(Debug, Clone, Serialize)]
struct IdealDimension {
    ideal: u32,
}

impl VideoConstraints {
    /// 既知のデバイスがあればdeviceId指定、無ければ背面カメラ優先
    fn for_device(device_id: Option<&str>) -> Self {
        Self {
            device_id: device_id.map(str::to_string),
            facing_mode: device_id.is_none().then(|| "environment".to_string()),
            width: IdealDimension { ideal: 1280 },
            height: IdealDimension { ideal: 720 },
        }
    }
}

/// カメラ一覧・選択中デバイス・保持中ストリーム
pub struct CameraController {
    cameras: Vec<MediaDeviceInfo>,
    index: usize,
    stream: Option<MediaStream>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            cameras: Vec::new(),
            index: 0,
            stream: None,
        }
    }

    /// 列挙し直したカメラ一覧を反映する
    pub fn set_cameras(&mut self, cameras: Vec<MediaDeviceInfo>) {
        self.cameras = cameras;
        if self.index >= self.cameras.len() {
            self.index = 0;
        }
    }

    pub fn camera_count(&self) -> usize {
        self.cameras.len()
    }

    /// 選択中デバイスのID（一覧が取れていなければNone）
    pub fn selected_device_id(&self) -> Option<String> {
        self.cameras.get(self.index).map(|d| d.device_id())
    }

    /// 次のカメラへ（1台以下なら何もしない）
    pub fn advance(&mut self) {
        if !self.cameras.is_empty() {
            self.index = (self.index + 1) % self.cameras.len();
        }
    }

    pub fn store_stream(&mut self, stream: MediaStream) {
        self.stream = Some(stream);
    }

    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// 全トラックを停止してストリームを手放す（冪等）
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
    }
}

/// videoinputデバイスを列挙する
pub async fn enumerate_video_inputs() -> Result<Vec<MediaDeviceInfo>> {
    let devices = media_devices()?;
    let list = JsFuture::from(devices.enumerate_devices().map_err(camera_err)?)
        .await
        .map_err(camera_err)?;

    Ok(js_sys::Array::from(&list)
        .iter()
        .filter_map(|d| d.dyn_into::<MediaDeviceInfo>().ok())
        .filter(|d| d.kind() == MediaDeviceKind::Videoinput)
        .collect())
}

/// カメラストリームを開く
pub async fn open_stream(device_id: Option<&str>) -> Result<MediaStream> {
    let video = VideoConstraints::for_device(device_id);
    let mut constraints = MediaStreamConstraints::new();
    constraints.video(
        &serde_wasm_bindgen::to_value(&video).map_err(|e| Error::Camera(e.to_string()))?,
    );

    let devices = media_devices()?;
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(camera_err)?;

    JsFuture::from(promise)
        .await
        .map_err(camera_err)?
        .dyn_into()
        .map_err(camera_err)
}

fn media_devices() -> Result<web_sys::MediaDevices> {
    web_sys::window()
        .ok_or_else(|| Error::Camera("no window".to_string()))?
        .navigator()
        .media_devices()
        .map_err(camera_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_with_device_id() {
        let constraints = VideoConstraints::for_device(Some("cam-1"));
        let json = serde_json::to_string(&constraints).expect("シリアライズ失敗");
        assert!(json.contains("\"deviceId\":\"cam-1\""));
        assert!(!json.contains("facingMode"));
        assert!(json.contains("\"width\":{\"ideal\":1280}"));
        assert!(json.contains("\"height\":{\"ideal\":720}"));
    }

    #[test]
    fn test_constraints_without_device_falls_back_to_environment() {
        let constraints = VideoConstraints::for_device(None);
        let json = serde_json::to_string(&constraints).expect("シリアライズ失敗");
        assert!(!json.contains("deviceId"));
        assert!(json.contains("\"facingMode\":\"environment\""));
    }

    #[test]
    fn test_controller_starts_without_stream() {
        let controller = CameraController::new();
        assert_eq!(controller.camera_count(), 0);
        assert!(!controller.has_stream());
        assert!(controller.selected_device_id().is_none());
    }

    #[test]
    fn test_advance_without_cameras_is_noop() {
        let mut controller = CameraController::new();
        controller.advance();
        assert!(controller.selected_device_id().is_none());
    }

    #[test]
    fn test_close_without_stream_is_noop() {
        let mut controller = CameraController::new();
        controller.close();
        assert!(!controller.has_stream());
    }
}
