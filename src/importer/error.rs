// ==========================================
// 护理实习管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::api::error::ApiError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 批次冲突 =====
    /// 同一文件内邮箱重复：整批拒绝
    #[error("邮箱重复，整批拒绝导入: {}", .0.join(", "))]
    DuplicateEmails(Vec<String>),

    // ===== 会话状态错误 =====
    #[error("未登录或登录已过期，请重新登录")]
    MissingCredential,

    #[error("当前没有待导入的批次")]
    NoBatch,

    #[error("批次中没有通过校验的记录")]
    NoValidRows,

    #[error("撤销操作已取消")]
    UndoCancelled,

    // ===== 远端调用错误 =====
    #[error("提交导入失败: {0}")]
    Submission(#[source] ApiError),

    #[error("撤销导入失败: {0}")]
    Undo(#[source] ApiError),
}

impl ImportError {
    /// 远端错误（提交或撤销）中后端给出的提示信息
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ImportError::Submission(e) | ImportError::Undo(e) => e.server_message(),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
