// ==========================================
// 护理实习管理系统 - 配置层
// ==========================================
// 职责: 系统配置管理,支持文件与环境变量覆写
// ==========================================

pub mod app_config;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use app_config::{
    default_config_path, env_keys, AppConfig, ConfigError, ConfigManager, ConfigResult,
};
pub use import_config_trait::ImportConfigReader;
