//! 学生検索フィルタ

use crate::types::Student;

/// 名前・PRN・メール・ステータスの部分一致（大文字小文字無視）で絞り込む
///
/// 空クエリは全件を返す。再フェッチはせず、表示中のスナップショットを
/// クローンして返すだけ
pub fn filter_students(students: &[Student], query: &str) -> Vec<Student> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return students.to_vec();
    }

    students
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&term)
                || s.prn.to_lowercase().contains(&term)
                || s.email.to_lowercase().contains(&term)
                || s.status.as_str().to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScanStatus;

    fn sample_students() -> Vec<Student> {
        vec![
            Student {
                name: "Asha".to_string(),
                prn: "P1".to_string(),
                email: "asha@example.edu".to_string(),
                status: ScanStatus::Pending,
                scanned_at: None,
            },
            Student {
                name: "Ravi".to_string(),
                prn: "P2".to_string(),
                email: "ravi@example.edu".to_string(),
                status: ScanStatus::Scanned,
                scanned_at: Some("2026-02-14 10:32:05 IST".to_string()),
            },
        ]
    }

    #[test]
    fn test_filter_by_status_substring() {
        let students = sample_students();
        let filtered = filter_students(&students, "scan");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Ravi");
    }

    #[test]
    fn test_empty_query_restores_all() {
        let students = sample_students();
        assert_eq!(filter_students(&students, "").len(), 2);
    }

    #[test]
    fn test_whitespace_query_restores_all() {
        let students = sample_students();
        assert_eq!(filter_students(&students, "   ").len(), 2);
    }

    #[test]
    fn test_filter_by_name_case_insensitive() {
        let students = sample_students();
        let filtered = filter_students(&students, "ASHA");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].prn, "P1");
    }

    #[test]
    fn test_filter_by_prn() {
        let students = sample_students();
        let filtered = filter_students(&students, "p2");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Ravi");
    }

    #[test]
    fn test_filter_by_email() {
        let students = sample_students();
        let filtered = filter_students(&students, "ravi@");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Ravi");
    }

    #[test]
    fn test_no_match() {
        let students = sample_students();
        assert!(filter_students(&students, "zzz").is_empty());
    }
}
