// ==========================================
// 护理实习管理系统 - 名册导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 映射 → 重复检测 → 校验 → 预览 → 提交 → 对账 → (撤销)
// ==========================================

use crate::domain::RowRecord;
use crate::importer::error::ImportResult;
use crate::importer::row_validator::RowViolation;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawRow - 原始行
// ==========================================
// 键为规范化后的表头（小写 + 去空白）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    pub cells: HashMap<String, String>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件首个工作表为原始行记录
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过空白行）
    /// - Err: 文件不存在、格式不支持、解析失败
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为 RowRecord；映射阶段不拒绝任何字段
    fn map_to_row_record(&self, row: RawRow) -> RowRecord;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 单行校验接口（纯函数，无副作用）
// 实现者: RoleRuleValidator
pub trait RowValidator: Send + Sync {
    /// 列出该行违反的全部规则
    fn violations(&self, row: &RowRecord) -> Vec<RowViolation>;

    /// 是否通过全部规则
    fn is_valid(&self, row: &RowRecord) -> bool {
        self.violations(row).is_empty()
    }
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 批次内冲突检测
// 实现者: ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 检测同批次内重复邮箱
    ///
    /// # 返回
    /// - Vec<String>: 重复的邮箱（每个只出现一次，按重复被发现的顺序）
    fn detect_duplicate_emails(&self, records: &[RowRecord]) -> Vec<String>;
}

// ==========================================
// Confirmer Trait
// ==========================================
// 用途: 高风险操作前的人工确认（撤销导入）
// 实现者: TerminalConfirmer, AutoConfirm（app::prompt）
pub trait Confirmer: Send + Sync {
    /// 返回 true 表示操作人明确同意
    fn confirm(&self, message: &str) -> bool;
}
