// ==========================================
// 护理实习管理系统 - 名册领域模型
// ==========================================
// 职责: 导入行记录 / 跳过记录 / 导入批次 / 导入结果
// 红线: 批次只存在于内存,不落库
// ==========================================

use crate::domain::types::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PersonName - 结构化姓名
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl PersonName {
    /// 前缀与名直接相连，姓前加空格（泰文称谓习惯）
    pub fn display(&self) -> String {
        let prefix = self.prefix.as_deref().unwrap_or("");
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{}{} {}", prefix, first, last).trim().to_string()
    }
}

// ==========================================
// UserName - 姓名（纯文本或结构化）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserName {
    Plain(String),
    Structured(PersonName),
}

impl UserName {
    pub fn display(&self) -> String {
        match self {
            UserName::Plain(name) => name.trim().to_string(),
            UserName::Structured(parts) => parts.display(),
        }
    }
}

// ==========================================
// RowRecord - 导入行记录
// ==========================================
// 对齐: POST /users/import 请求体中的 users[] 元素
// 说明: 所有字段在解析阶段均可为空，合法性只在校验阶段判定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<UserName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    // 未识别的表头（小写键）原样透传
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,

    // 工作表行号（表头为第 1 行），仅本地使用
    #[serde(skip)]
    pub row_number: usize,
}

impl RowRecord {
    /// 邮箱（自然键），空值返回 ""
    pub fn email_key(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    /// 已识别的角色（未知角色返回 None）
    pub fn parsed_role(&self) -> Option<UserRole> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// 展示用姓名
    pub fn display_name(&self) -> String {
        self.name.as_ref().map(UserName::display).unwrap_or_default()
    }
}

// ==========================================
// SkippedEntry - 后端拒绝导入的记录
// ==========================================
// 由后端返回的 {email, reason} 与原始行的展示字段合并而成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    pub email: String,
    pub reason: String,
    pub name: Option<UserName>,
    pub display_name: String,
    pub student_id: Option<String>,
    pub provider: Option<String>,
    pub role: Option<String>,
}

impl SkippedEntry {
    pub fn from_row(row: &RowRecord, reason: String) -> Self {
        Self {
            email: row.email_key().to_string(),
            reason,
            name: row.name.clone(),
            display_name: row.display_name(),
            student_id: row.student_id.clone(),
            provider: row.provider.clone(),
            role: row.role.clone(),
        }
    }
}

// ==========================================
// ImportBatch - 导入批次（内存态）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch {
    pub file_name: String,
    pub rows: Vec<RowRecord>,
}

impl ImportBatch {
    pub fn new(file_name: impl Into<String>, rows: Vec<RowRecord>) -> Self {
        Self {
            file_name: file_name.into(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find_by_email(&self, email: &str) -> Option<&RowRecord> {
        self.rows.iter().find(|r| r.email_key() == email)
    }
}

// ==========================================
// ImportOutcome - 提交结果（成功 / 跳过）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub file_name: String,
    pub success: Vec<RowRecord>,
    pub skipped: Vec<SkippedEntry>,
    pub imported_at: DateTime<Utc>,
}

impl ImportOutcome {
    pub fn success_count(&self) -> usize {
        self.success.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn sent_count(&self) -> usize {
        self.success.len() + self.skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_row() -> RowRecord {
        RowRecord {
            name: Some(UserName::Structured(PersonName {
                prefix: Some("นาย".to_string()),
                first_name: Some("สมชาย".to_string()),
                last_name: Some("ใจดี".to_string()),
            })),
            email: Some("somchai@nu.ac.th".to_string()),
            role: Some("STUDENT".to_string()),
            provider: Some("GOOGLE".to_string()),
            student_id: Some("64000001".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_structured_display_name() {
        assert_eq!(student_row().display_name(), "นายสมชาย ใจดี");
    }

    #[test]
    fn test_plain_display_name_trimmed() {
        let row = RowRecord {
            name: Some(UserName::Plain("  Jane Doe ".to_string())),
            ..Default::default()
        };
        assert_eq!(row.display_name(), "Jane Doe");
    }

    #[test]
    fn test_serialize_row_camel_case_and_extra() {
        let mut row = student_row();
        row.extra.insert("faculty".to_string(), "nursing".to_string());
        row.row_number = 7;

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["studentId"], "64000001");
        assert_eq!(json["name"]["firstName"], "สมชาย");
        assert_eq!(json["faculty"], "nursing");
        assert!(json.get("password").is_none());
        assert!(json.get("rowNumber").is_none());
    }

    #[test]
    fn test_skipped_entry_from_row() {
        let entry = SkippedEntry::from_row(&student_row(), "Email already exists".to_string());
        assert_eq!(entry.email, "somchai@nu.ac.th");
        assert_eq!(entry.display_name, "นายสมชาย ใจดี");
        assert_eq!(entry.student_id.as_deref(), Some("64000001"));
        assert_eq!(entry.reason, "Email already exists");
    }
}
