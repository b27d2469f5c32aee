//! QRペイロード正規化

/// デコード結果・手入力からQRハッシュを取り出す
///
/// Google Lens等で読むとQRの中身がURLとして渡ってくるため、
/// URL形式なら最後のパスセグメントを、それ以外はトリムした文字列を返す
///
/// # Arguments
/// * `raw` - デコードされた生ペイロードまたは手入力文字列
pub fn extract_qr_hash(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http") {
        trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_url() {
        assert_eq!(extract_qr_hash("https://host/path/ABC123"), "ABC123");
    }

    #[test]
    fn test_extract_from_validate_url() {
        assert_eq!(
            extract_qr_hash("https://event.example.com/validate/a1b2c3d4e5"),
            "a1b2c3d4e5"
        );
    }

    #[test]
    fn test_raw_hash_unchanged() {
        assert_eq!(extract_qr_hash("ABC123"), "ABC123");
    }

    #[test]
    fn test_raw_hash_trimmed() {
        assert_eq!(extract_qr_hash("  ABC123\n"), "ABC123");
    }

    #[test]
    fn test_http_without_tls() {
        assert_eq!(extract_qr_hash("http://host/validate/xyz"), "xyz");
    }

    #[test]
    fn test_url_with_trailing_slash() {
        // 元実装のsplit('/').pop()と同じく空文字になる
        assert_eq!(extract_qr_hash("https://host/path/"), "");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_qr_hash(""), "");
    }
}
