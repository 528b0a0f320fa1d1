// ==========================================
// 护理实习管理系统 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表（db::init_schema）
// 红线: 只记录导入摘要，不记录行数据
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use self::core::ActionLogRepository;
