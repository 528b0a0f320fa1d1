// ==========================================
// 护理实习管理系统 - 后端接口 DTO
// ==========================================
// 对齐:
// - POST {backend}/users/import       请求 { users }, 响应 { skippedEmails }
// - POST {backend}/users/import/undo  无请求体
// ==========================================

use crate::domain::RowRecord;
use serde::{Deserialize, Serialize};

/// 导入请求体（仅包含通过校验的行）
#[derive(Debug, Serialize)]
pub struct ImportRequest<'a> {
    pub users: &'a [RowRecord],
}

/// 后端拒绝导入的单条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEmail {
    pub email: String,
    #[serde(default)]
    pub reason: String,
}

/// 导入响应：未出现在 skippedEmails 中的行均视为导入成功
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    #[serde(default)]
    pub skipped_emails: Vec<SkippedEmail>,
}

/// 撤销响应（后端可能只返回空体）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_response_missing_field_is_empty() {
        let resp: ImportResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.skipped_emails.is_empty());
    }

    #[test]
    fn test_import_response_parses_skipped() {
        let resp: ImportResponse = serde_json::from_str(
            r#"{"skippedEmails":[{"email":"x@nu.ac.th","reason":"Email already exists"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.skipped_emails.len(), 1);
        assert_eq!(resp.skipped_emails[0].email, "x@nu.ac.th");
        assert_eq!(resp.skipped_emails[0].reason, "Email already exists");
    }

    #[test]
    fn test_import_request_shape() {
        let rows = vec![RowRecord {
            email: Some("a@nu.ac.th".to_string()),
            ..Default::default()
        }];
        let json = serde_json::to_value(ImportRequest { users: &rows }).unwrap();
        assert_eq!(json["users"][0]["email"], "a@nu.ac.th");
    }
}
