// ==========================================
// 护理实习管理系统 - 应用层
// ==========================================
// 职责: 命令行集成,连接操作人与导入流程
// ==========================================

pub mod cli;
pub mod commands;
pub mod prompt;
pub mod state;

// 重导出
pub use cli::{Cli, Command};
pub use commands::{operator_message, run};
pub use prompt::{AutoConfirm, TerminalConfirmer};
pub use state::AppState;
