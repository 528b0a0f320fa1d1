// ==========================================
// 护理实习管理系统 - 数据仓储层
// ==========================================
// 职责: 本地操作日志的读写
// ==========================================

pub mod action_log_repo;
pub mod error;

pub use action_log_repo::ActionLogRepository;
pub use error::{RepositoryError, RepositoryResult};
