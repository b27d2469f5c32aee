//! 送信前ガード（名簿ファイル種別・全削除の確認フレーズ）

/// 名簿アップロードで受け付ける拡張子
pub const ROSTER_EXTENSIONS: [&str; 3] = [".xlsx", ".xls", ".csv"];

/// 全データ削除の確認フレーズ
pub const CLEAR_CONFIRMATION: &str = "CLEAR_ALL_DATA";

/// 拡張子チェック（大文字小文字無視）
///
/// ここで弾いた場合はリクエスト自体を発行しない
pub fn is_supported_roster_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    ROSTER_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// 確認フレーズの判定
///
/// 完全一致のみ有効。前後の空白もトリムせず不一致として扱う
pub fn confirmation_matches(input: &str) -> bool {
    input == CLEAR_CONFIRMATION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_csv_accepted() {
        assert!(is_supported_roster_file("roster.csv"));
    }

    #[test]
    fn test_roster_excel_accepted() {
        assert!(is_supported_roster_file("students.xlsx"));
        assert!(is_supported_roster_file("students.xls"));
    }

    #[test]
    fn test_roster_case_insensitive() {
        assert!(is_supported_roster_file("ROSTER.CSV"));
        assert!(is_supported_roster_file("Batch2026.XLSX"));
    }

    #[test]
    fn test_roster_pdf_rejected() {
        assert!(!is_supported_roster_file("roster.pdf"));
    }

    #[test]
    fn test_roster_no_extension_rejected() {
        assert!(!is_supported_roster_file("roster"));
    }

    #[test]
    fn test_confirmation_exact_match() {
        assert!(confirmation_matches("CLEAR_ALL_DATA"));
    }

    #[test]
    fn test_confirmation_lowercase_rejected() {
        assert!(!confirmation_matches("clear_all_data"));
    }

    #[test]
    fn test_confirmation_trailing_space_rejected() {
        assert!(!confirmation_matches("CLEAR_ALL_DATA "));
    }

    #[test]
    fn test_confirmation_empty_rejected() {
        assert!(!confirmation_matches(""));
    }
}
