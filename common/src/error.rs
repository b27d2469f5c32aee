//! エラー型定義

use thiserror::Error;

/// フロントエンド共通エラー型
///
/// Api: サーバが返したエラーテキスト（そのままユーザーに表示する）
/// Network: fetch/XHRの転送失敗
/// Validation: 送信前チェックで弾いたもの（リクエストは発行しない）
/// Camera: カメラストリームの取得失敗
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Validation(String),

    #[error("Camera error: {0}")]
    Camera(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_api_is_verbatim() {
        // サーバ文言は加工せずそのまま表示する
        let error = Error::Api("Email configuration not set".to_string());
        assert_eq!(format!("{}", error), "Email configuration not set");
    }

    #[test]
    fn test_error_display_network() {
        let error = Error::Network("Failed to fetch".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Network error"));
        assert!(display.contains("Failed to fetch"));
    }

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation("Please select a file".to_string());
        assert_eq!(format!("{}", error), "Please select a file");
    }

    #[test]
    fn test_error_display_camera() {
        let error = Error::Camera("NotAllowedError".to_string());
        assert!(format!("{}", error).contains("Camera error"));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::Api("boom".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("Api"));
        assert!(debug.contains("boom"));
    }
}
