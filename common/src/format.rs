//! 日時・数値の表示用フォーマット

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// IST(+05:30)
fn ist_offset() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap()
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// 受付時刻の表示用フォーマット
///
/// サーバは基本的にIST文字列（"... IST"）を返すのでそのまま表示する。
/// それ以外の形式はISTに変換し、解釈できなければ原文を返す。
/// 空文字は"N/A"
pub fn format_date(date_string: &str) -> String {
    if date_string.is_empty() {
        return "N/A".to_string();
    }
    if date_string.contains("IST") {
        return date_string.to_string();
    }
    match parse_timestamp(date_string) {
        Some(dt) => dt
            .with_timezone(&ist_offset())
            .format("%b %-d, %Y, %I:%M:%S %p IST")
            .to_string(),
        None => date_string.to_string(),
    }
}

/// 3桁区切りのカンマを挿入する
pub fn format_number(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_ist_passthrough() {
        // サーバが付けたISTサフィックスはそのまま
        assert_eq!(
            format_date("2026-02-14 10:32:05 IST"),
            "2026-02-14 10:32:05 IST"
        );
    }

    #[test]
    fn test_format_date_empty() {
        assert_eq!(format_date(""), "N/A");
    }

    #[test]
    fn test_format_date_rfc3339_converted_to_ist() {
        // 05:02:05 UTC = 10:32:05 IST
        let formatted = format_date("2026-02-14T05:02:05Z");
        assert_eq!(formatted, "Feb 14, 2026, 10:32:05 AM IST");
    }

    #[test]
    fn test_format_date_unparseable_returns_original() {
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_format_number_small() {
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn test_format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(12_345), "12,345");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0), "0");
    }
}
