//! APIリクエストユーティリティ
//!
//! fetchベースのJSONリクエスト。非2xxはボディのerror/messageを
//! そのままError::Apiとして返し、転送失敗はError::Networkになる。
//! 進捗付きアップロードはupload参照

pub mod upload;

use checkin_common::{Error, ErrorBody, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// エンドポイント定義
pub const API_DASHBOARD_STATS: &str = "/api/dashboard_stats";
pub const API_VALIDATE_QR: &str = "/api/validate_qr";
pub const API_UPLOAD_STUDENTS: &str = "/api/upload_students";
pub const API_GENERATE_QR_CODES: &str = "/api/generate_qr_codes";
pub const API_SEND_EMAILS: &str = "/api/send_emails";
pub const API_CLEAR_ALL_DATA: &str = "/api/clear_all_data";
pub const API_EXPORT_DATA: &str = "/api/export_data";

pub(crate) fn network_err(e: JsValue) -> Error {
    Error::Network(format!("{:?}", e))
}

/// 非2xxレスポンスのボディからエラーテキストを取り出す
pub fn error_text_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_text)
}

async fn request_json<T: DeserializeOwned>(
    method: &str,
    url: &str,
    body: Option<String>,
) -> Result<T> {
    let mut opts = RequestInit::new();
    opts.method(method);
    opts.mode(RequestMode::Cors);
    if let Some(body) = &body {
        opts.body(Some(&JsValue::from_str(body)));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(network_err)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(network_err)?;

    let window = web_sys::window().ok_or_else(|| Error::Network("no window".to_string()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(network_err)?;
    let resp: Response = resp_value.dyn_into().map_err(network_err)?;

    if !resp.ok() {
        let text = JsFuture::from(resp.text().map_err(network_err)?)
            .await
            .map_err(network_err)?;
        let body = text.as_string().unwrap_or_default();
        let message =
            error_text_from_body(&body).unwrap_or_else(|| "Request failed".to_string());
        return Err(Error::Api(message));
    }

    let json = JsFuture::from(resp.json().map_err(network_err)?)
        .await
        .map_err(network_err)?;
    serde_wasm_bindgen::from_value(json)
        .map_err(|e| Error::Api(format!("Invalid response format: {}", e)))
}

/// GETでJSONを取得する
pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T> {
    request_json("GET", url, None).await
}

/// ボディ無しのPOST
pub async fn post_empty<T: DeserializeOwned>(url: &str) -> Result<T> {
    request_json("POST", url, None).await
}

/// JSONボディ付きのPOST
pub async fn post_json<T: DeserializeOwned, B: Serialize>(url: &str, body: &B) -> Result<T> {
    let body = serde_json::to_string(body).map_err(|e| Error::Validation(e.to_string()))?;
    request_json("POST", url, Some(body)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_text_prefers_error_field() {
        let body = r#"{"error": "No file provided"}"#;
        assert_eq!(error_text_from_body(body).as_deref(), Some("No file provided"));
    }

    #[test]
    fn test_error_text_falls_back_to_message() {
        let body = r#"{"message": "Invalid QR code"}"#;
        assert_eq!(error_text_from_body(body).as_deref(), Some("Invalid QR code"));
    }

    #[test]
    fn test_error_text_non_json_body() {
        assert!(error_text_from_body("<html>502 Bad Gateway</html>").is_none());
    }

    #[test]
    fn test_error_text_empty_object() {
        assert!(error_text_from_body("{}").is_none());
    }
}
