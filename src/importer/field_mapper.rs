// ==========================================
// 护理实习管理系统 - 字段映射器实现
// ==========================================
// 阶段 1: 原始行 → RowRecord
// 规则:
// - prefix / firstname / lastname 合并为结构化姓名
// - role / provider 转大写；provider 为空时按角色派生
// - 其余字段去空白，空值视为未设置
// - 未识别表头以小写键透传
// ==========================================

use crate::domain::{PersonName, RowRecord, UserName, UserRole};
use crate::importer::roster_importer_trait::{FieldMapper as FieldMapperTrait, RawRow};

// 已识别表头（均为规范化后的小写形式）
const KEY_NAME: &str = "name";
const KEY_PREFIX: &str = "prefix";
const KEY_FIRST_NAME: &str = "firstname";
const KEY_LAST_NAME: &str = "lastname";
const KEY_EMAIL: &str = "email";
const KEY_ROLE: &str = "role";
const KEY_PROVIDER: &str = "provider";
const KEY_STUDENT_ID: &str = "studentid";
const KEY_PASSWORD: &str = "password";

/// 空白 → None，否则去空白
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ==========================================
// RowRecordBuilder - 逐字段累积为 RowRecord
// ==========================================
#[derive(Debug, Default)]
pub struct RowRecordBuilder {
    record: RowRecord,
    plain_name: Option<String>,
    name_parts: PersonName,
}

impl RowRecordBuilder {
    pub fn new(row_number: usize) -> Self {
        Self {
            record: RowRecord {
                row_number,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// 写入单个字段（key 必须已规范化）
    pub fn field(mut self, key: &str, value: &str) -> Self {
        match key {
            KEY_NAME => self.plain_name = non_blank(value),
            KEY_PREFIX => self.name_parts.prefix = non_blank(value),
            KEY_FIRST_NAME => self.name_parts.first_name = non_blank(value),
            KEY_LAST_NAME => self.name_parts.last_name = non_blank(value),
            KEY_EMAIL => self.record.email = non_blank(value),
            KEY_ROLE => self.record.role = non_blank(value).map(|v| v.to_uppercase()),
            KEY_PROVIDER => self.record.provider = non_blank(value).map(|v| v.to_uppercase()),
            KEY_STUDENT_ID => self.record.student_id = non_blank(value),
            KEY_PASSWORD => self.record.password = non_blank(value),
            other => {
                if let Some(v) = non_blank(value) {
                    self.record.extra.insert(other.to_string(), v);
                }
            }
        }
        self
    }

    pub fn build(mut self) -> RowRecord {
        // 结构化姓名优先于纯文本姓名
        let has_parts = self.name_parts.prefix.is_some()
            || self.name_parts.first_name.is_some()
            || self.name_parts.last_name.is_some();
        self.record.name = if has_parts {
            Some(UserName::Structured(self.name_parts))
        } else {
            self.plain_name.map(UserName::Plain)
        };

        // provider 缺失时按角色派生（未知角色不派生，留给校验阶段）
        if self.record.provider.is_none() {
            self.record.provider = self
                .record
                .role
                .as_deref()
                .and_then(|r| r.parse::<UserRole>().ok())
                .map(|role| role.default_provider().as_str().to_string());
        }

        self.record
    }
}

// ==========================================
// FieldMapper 实现
// ==========================================
pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_to_row_record(&self, row: RawRow) -> RowRecord {
        let mut builder = RowRecordBuilder::new(row.row_number);
        for (key, value) in &row.cells {
            builder = builder.field(key, value);
        }
        builder.build()
    }
}
