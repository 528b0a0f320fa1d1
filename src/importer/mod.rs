// ==========================================
// 护理实习管理系统 - 导入层
// ==========================================
// 职责: 名册文件 → 校验 → 预览 → 提交 → 对账 → 撤销
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_session;
pub mod preview;
pub mod roster_importer_trait;
pub mod row_validator;
pub mod submitter;

// 重导出核心类型
pub use conflict_handler::ConflictHandler as ConflictHandlerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper as FieldMapperImpl, RowRecordBuilder};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use import_session::ImportSession;
pub use preview::{PreviewPage, PreviewQuery, PreviewRow, DEFAULT_PAGE_SIZE};
pub use row_validator::{RoleRuleValidator, RowViolation, CAMPUS_EMAIL_SUFFIX};
pub use submitter::{reconcile, Submitter, UndoWindow};

// 重导出 Trait 接口
pub use roster_importer_trait::{
    ConflictHandler, Confirmer, FieldMapper, FileParser, RawRow, RowValidator,
};
