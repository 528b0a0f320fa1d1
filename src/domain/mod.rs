// ==========================================
// 护理实习管理系统 - 领域模型层
// ==========================================
// 职责: 定义名册导入相关的实体与类型
// 红线: 不含数据访问逻辑,不含校验逻辑
// ==========================================

pub mod action_log;
pub mod roster;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use roster::{ImportBatch, ImportOutcome, PersonName, RowRecord, SkippedEntry, UserName};
pub use types::{AuthProvider, UserRole, ValidityFilter};
