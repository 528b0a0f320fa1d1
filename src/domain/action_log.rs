// ==========================================
// 护理实习管理系统 - 操作日志领域模型
// ==========================================
// 用途: 本地审计追踪（导入 / 撤销导入）
// 红线: 只记录数量与文件名，不记录行数据（含密码）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 对齐: action_log 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,         // 日志ID
    pub action_type: ActionType,   // 操作类型
    pub action_ts: NaiveDateTime,  // 操作时间戳 (UTC)
    pub actor: String,             // 操作人（会话邮箱，未知时为 "unknown"）

    // ===== 导入摘要 =====
    pub file_name: Option<String>, // 来源文件名
    pub success_count: i64,        // 成功导入数量
    pub skipped_count: i64,        // 后端跳过数量

    pub detail: Option<String>,    // 详细描述
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Import,     // 提交导入
    UndoImport, // 撤销最近一次导入
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Import => "IMPORT",
            ActionType::UndoImport => "UNDO_IMPORT",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMPORT" => Ok(ActionType::Import),
            "UNDO_IMPORT" => Ok(ActionType::UndoImport),
            other => Err(format!("未知操作类型: {}", other)),
        }
    }
}
