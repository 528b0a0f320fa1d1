// ==========================================
// 护理实习管理系统 - 单行校验器实现
// ==========================================
// 规则（全部通过才算合法）:
// 1. 姓名: 纯文本非空，或结构化姓名的 firstName 与 lastName 均非空
// 2. email 非空
// 3. role 非空且为四种角色之一
// 4. provider 非空
// 5. APPROVER_OUT / EXPERIENCE_MANAGER: password 非空
// 6. STUDENT: studentId 为 8 位 ASCII 数字，且 email 以 @nu.ac.th 结尾
// 7. APPROVER_IN: email 以 @nu.ac.th 结尾
// ==========================================

use crate::domain::{RowRecord, UserName, UserRole};
use crate::importer::roster_importer_trait::RowValidator;
use serde::Serialize;
use std::fmt;

/// 校内邮箱后缀（字面量匹配，区分大小写）
pub const CAMPUS_EMAIL_SUFFIX: &str = "@nu.ac.th";

/// 学号长度
pub const STUDENT_ID_LEN: usize = 8;

// ==========================================
// RowViolation - 违规项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowViolation {
    MissingName,
    MissingEmail,
    MissingRole,
    UnknownRole,
    MissingProvider,
    MissingPassword,
    InvalidStudentId,
    NonCampusEmail,
}

impl RowViolation {
    /// i18n 键
    pub fn message_key(&self) -> &'static str {
        match self {
            RowViolation::MissingName => "violation.missing_name",
            RowViolation::MissingEmail => "violation.missing_email",
            RowViolation::MissingRole => "violation.missing_role",
            RowViolation::UnknownRole => "violation.unknown_role",
            RowViolation::MissingProvider => "violation.missing_provider",
            RowViolation::MissingPassword => "violation.missing_password",
            RowViolation::InvalidStudentId => "violation.invalid_student_id",
            RowViolation::NonCampusEmail => "violation.non_campus_email",
        }
    }
}

impl fmt::Display for RowViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RowViolation::MissingName => "MISSING_NAME",
            RowViolation::MissingEmail => "MISSING_EMAIL",
            RowViolation::MissingRole => "MISSING_ROLE",
            RowViolation::UnknownRole => "UNKNOWN_ROLE",
            RowViolation::MissingProvider => "MISSING_PROVIDER",
            RowViolation::MissingPassword => "MISSING_PASSWORD",
            RowViolation::InvalidStudentId => "INVALID_STUDENT_ID",
            RowViolation::NonCampusEmail => "NON_CAMPUS_EMAIL",
        };
        write!(f, "{}", code)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn has_name(name: Option<&UserName>) -> bool {
    match name {
        Some(UserName::Plain(s)) => !s.trim().is_empty(),
        Some(UserName::Structured(parts)) => {
            !is_blank(parts.first_name.as_deref()) && !is_blank(parts.last_name.as_deref())
        }
        None => false,
    }
}

/// 学号必须恰好 8 位 ASCII 数字
pub fn is_valid_student_id(value: &str) -> bool {
    value.len() == STUDENT_ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_campus_email(email: &str) -> bool {
    email.ends_with(CAMPUS_EMAIL_SUFFIX)
}

// ==========================================
// RoleRuleValidator - 按角色的准入规则
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRuleValidator;

impl RowValidator for RoleRuleValidator {
    fn violations(&self, row: &RowRecord) -> Vec<RowViolation> {
        let mut violations = Vec::new();

        if !has_name(row.name.as_ref()) {
            violations.push(RowViolation::MissingName);
        }

        let email = row.email.as_deref().unwrap_or("");
        if email.trim().is_empty() {
            violations.push(RowViolation::MissingEmail);
        }

        let role = if is_blank(row.role.as_deref()) {
            violations.push(RowViolation::MissingRole);
            None
        } else {
            let parsed = row.parsed_role();
            if parsed.is_none() {
                violations.push(RowViolation::UnknownRole);
            }
            parsed
        };

        if is_blank(row.provider.as_deref()) {
            violations.push(RowViolation::MissingProvider);
        }

        if let Some(role) = role {
            if role.requires_password() && is_blank(row.password.as_deref()) {
                violations.push(RowViolation::MissingPassword);
            }

            if role == UserRole::Student {
                let student_id = row.student_id.as_deref().unwrap_or("");
                if !is_valid_student_id(student_id) {
                    violations.push(RowViolation::InvalidStudentId);
                }
            }

            if role.requires_campus_email() && !email.is_empty() && !is_campus_email(email) {
                violations.push(RowViolation::NonCampusEmail);
            }
        }

        violations
    }
}
