// ==========================================
// 护理实习管理系统 - API 层
// ==========================================
// 职责: 封装远端 REST 后端调用
// ==========================================

pub mod dto;
pub mod error;
pub mod import_client;

pub use dto::{ImportRequest, ImportResponse, SkippedEmail, UndoResponse};
pub use error::{ApiError, ApiResult};
pub use import_client::{HttpImportGateway, ImportGateway};
