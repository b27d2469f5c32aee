//! サーバAPIの型定義
//!
//! 各ページコントローラで共有される型:
//! - DashboardSnapshot: /api/dashboard_stats のレスポンス全体
//! - ValidateResponse: /api/validate_qr のレスポンス
//! - MessageResponse / ClearResponse: 管理操作系のレスポンス
//!
//! サーバ側で集計されたスナップショットであり、ローカルでは書き換えない
//! （更新は次回ポーリングでの再取得のみ）

use serde::{Deserialize, Serialize};

/// 受付ステータス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Scanned,
    #[default]
    Pending,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Scanned => "Scanned",
            ScanStatus::Pending => "Pending",
        }
    }
}

/// 学生（名簿1行分のスナップショット）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub prn: String,
    pub email: String,
    pub status: ScanStatus,
    /// 未受付の場合はnull
    #[serde(default)]
    pub scanned_at: Option<String>,
}

/// 集計値（サーバ側で算出済み）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_students: u32,
    pub scanned_count: u32,
    pub pending_count: u32,
    pub scan_percentage: f64,
}

/// 直近の受付履歴1件（新しい順で返される）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentScan {
    pub name: String,
    pub prn: String,
    pub scanned_at: String,
}

/// /api/dashboard_stats のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: ScanStats,
    #[serde(default)]
    pub recent_scans: Vec<RecentScan>,
    #[serde(default)]
    pub all_students: Vec<Student>,
}

/// QR検証で返される学生情報
///
/// 「受付済み」エラー時はemailを含まないレスポンスが返るためdefault
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScannedStudent {
    pub name: String,
    pub prn: String,
    #[serde(default)]
    pub email: String,
}

/// /api/validate_qr のリクエストボディ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub qr_hash: String,
}

/// /api/validate_qr のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub student: Option<ScannedStudent>,
}

/// アップロード・QR生成・メール送信のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// /api/clear_all_data のリクエストボディ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearRequest {
    pub confirmation: String,
}

/// 削除件数の内訳
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearCounts {
    pub students: u32,
    pub scans: u32,
}

/// /api/clear_all_data のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cleared: Option<ClearCounts>,
}

/// 非2xxレスポンスのボディ（error/messageのどちらかにテキストが入る）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// サーバが返したエラーテキストを取り出す
    pub fn into_text(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_deserialize() {
        let json = r#"{
            "name": "Asha Patil",
            "prn": "21510001",
            "email": "asha.patil@example.edu",
            "status": "Pending",
            "scanned_at": null
        }"#;

        let student: Student = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(student.name, "Asha Patil");
        assert_eq!(student.prn, "21510001");
        assert_eq!(student.status, ScanStatus::Pending);
        assert!(student.scanned_at.is_none());
    }

    #[test]
    fn test_student_deserialize_scanned() {
        let json = r#"{
            "name": "Ravi Kulkarni",
            "prn": "21510002",
            "email": "ravi.k@example.edu",
            "status": "Scanned",
            "scanned_at": "2026-02-14 10:32:05 IST"
        }"#;

        let student: Student = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(student.status, ScanStatus::Scanned);
        assert_eq!(
            student.scanned_at.as_deref(),
            Some("2026-02-14 10:32:05 IST")
        );
    }

    #[test]
    fn test_student_roundtrip() {
        let original = Student {
            name: "Sneha Joshi".to_string(),
            prn: "21510003".to_string(),
            email: "sneha.j@example.edu".to_string(),
            status: ScanStatus::Scanned,
            scanned_at: Some("2026-02-14 09:15:40 IST".to_string()),
        };

        let json = serde_json::to_string(&original).expect("シリアライズ失敗");
        assert!(json.contains("\"status\":\"Scanned\""));

        let restored: Student = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(original, restored);
    }

    #[test]
    fn test_dashboard_snapshot_deserialize() {
        // サーバレスポンスと同じ形
        let json = r#"{
            "stats": {
                "total_students": 120,
                "scanned_count": 45,
                "pending_count": 75,
                "scan_percentage": 37.5
            },
            "recent_scans": [
                {"name": "Asha Patil", "prn": "21510001", "scanned_at": "2026-02-14 10:32:05 IST"}
            ],
            "all_students": [
                {"name": "Asha Patil", "prn": "21510001", "email": "asha.patil@example.edu", "status": "Scanned", "scanned_at": "2026-02-14 10:32:05 IST"}
            ]
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(snapshot.stats.total_students, 120);
        assert_eq!(snapshot.stats.scan_percentage, 37.5);
        assert_eq!(snapshot.recent_scans.len(), 1);
        assert_eq!(snapshot.all_students[0].status, ScanStatus::Scanned);
    }

    #[test]
    fn test_dashboard_snapshot_missing_lists() {
        // stats以外が欠けていてもデフォルトで埋まること
        let json = r#"{"stats": {"total_students": 0, "scanned_count": 0, "pending_count": 0, "scan_percentage": 0}}"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(snapshot.recent_scans.is_empty());
        assert!(snapshot.all_students.is_empty());
    }

    // =============================================
    // ValidateResponse テスト
    // =============================================

    #[test]
    fn test_validate_response_valid() {
        let json = r#"{
            "valid": true,
            "message": "QR code scanned successfully",
            "student": {"name": "Asha Patil", "prn": "21510001", "email": "asha.patil@example.edu"}
        }"#;

        let response: ValidateResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(response.valid);
        let student = response.student.expect("studentが無い");
        assert_eq!(student.name, "Asha Patil");
        assert_eq!(student.email, "asha.patil@example.edu");
    }

    #[test]
    fn test_validate_response_already_scanned() {
        // 受付済みエラーはstudentにemailを含まない
        let json = r#"{
            "valid": false,
            "message": "QR code already scanned",
            "student": {"name": "Asha Patil", "prn": "21510001"}
        }"#;

        let response: ValidateResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(!response.valid);
        assert_eq!(response.message.as_deref(), Some("QR code already scanned"));
        assert_eq!(response.student.expect("studentが無い").email, "");
    }

    #[test]
    fn test_validate_response_invalid() {
        let json = r#"{"valid": false, "message": "Invalid QR code"}"#;

        let response: ValidateResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(!response.valid);
        assert!(response.student.is_none());
    }

    // =============================================
    // ClearResponse / ErrorBody テスト
    // =============================================

    #[test]
    fn test_clear_response_success() {
        let json = r#"{
            "success": true,
            "message": "All data cleared",
            "cleared": {"students": 120, "scans": 45}
        }"#;

        let response: ClearResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(response.success);
        let cleared = response.cleared.expect("clearedが無い");
        assert_eq!(cleared.students, 120);
        assert_eq!(cleared.scans, 45);
    }

    #[test]
    fn test_clear_response_error() {
        let json = r#"{"error": "Invalid confirmation"}"#;

        let response: ClearResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Invalid confirmation"));
        assert!(response.cleared.is_none());
    }

    #[test]
    fn test_error_body_prefers_error_field() {
        let json = r#"{"error": "Server error", "message": "ignored"}"#;
        let body: ErrorBody = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(body.into_text().as_deref(), Some("Server error"));
    }

    #[test]
    fn test_error_body_falls_back_to_message() {
        let json = r#"{"message": "No file provided"}"#;
        let body: ErrorBody = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(body.into_text().as_deref(), Some("No file provided"));
    }

    #[test]
    fn test_error_body_empty() {
        let body: ErrorBody = serde_json::from_str("{}").expect("デシリアライズ失敗");
        assert!(body.into_text().is_none());
    }
}
