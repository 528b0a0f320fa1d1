// ==========================================
// 护理实习管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、校验、环境变量覆写
// 优先级: 环境变量 > 配置文件 > 默认值
// 存储: TOML 文件（缺失时使用默认值）
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// 应用目录名（config_dir / data_dir 下）
pub const APP_DIR_NAME: &str = "nu-roster-import";

/// 撤销倒计时上限（7 天）
pub const MAX_UNDO_WINDOW_MINUTES: i64 = 7 * 24 * 60;

// ==========================================
// 配置键（环境变量）
// ==========================================
pub mod env_keys {
    pub const BACKEND_URL: &str = "NU_ROSTER_BACKEND_URL";
    pub const PAGE_SIZE: &str = "NU_ROSTER_PAGE_SIZE";
    pub const UNDO_WINDOW_MINUTES: &str = "NU_ROSTER_UNDO_WINDOW_MINUTES";
    pub const REQUEST_TIMEOUT_SECS: &str = "NU_ROSTER_REQUEST_TIMEOUT_SECS";
    pub const LOCALE: &str = "NU_ROSTER_LOCALE";
    pub const DB_PATH: &str = "NU_ROSTER_DB_PATH";
    pub const SESSION_PATH: &str = "NU_ROSTER_SESSION_PATH";
}

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("配置值无效 (key={key}): {message}")]
    Invalid { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,          // 后端地址
    pub page_size: usize,             // 预览每页行数
    pub undo_window_minutes: i64,     // 撤销倒计时（仅展示）
    pub request_timeout_secs: u64,    // 请求超时，0 表示不限
    pub locale: String,               // 界面语言
    pub db_path: Option<PathBuf>,     // 操作日志库路径
    pub session_path: Option<PathBuf>, // 会话文件路径
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3000".to_string(),
            page_size: 10,
            undo_window_minutes: 30,
            request_timeout_secs: 30,
            locale: "th".to_string(),
            db_path: None,
            session_path: None,
        }
    }
}

impl AppConfig {
    /// 从 TOML 文本解析（未出现的键取默认值）
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆写
    ///
    /// lookup 由调用方注入，测试时无需修改进程环境
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get(env_keys::BACKEND_URL) {
            self.backend_url = v;
        }
        if let Some(v) = get(env_keys::PAGE_SIZE) {
            self.page_size = parse_number(env_keys::PAGE_SIZE, &v)?;
        }
        if let Some(v) = get(env_keys::UNDO_WINDOW_MINUTES) {
            self.undo_window_minutes = parse_number(env_keys::UNDO_WINDOW_MINUTES, &v)?;
        }
        if let Some(v) = get(env_keys::REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = parse_number(env_keys::REQUEST_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(env_keys::LOCALE) {
            self.locale = v;
        }
        if let Some(v) = get(env_keys::DB_PATH) {
            self.db_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get(env_keys::SESSION_PATH) {
            self.session_path = Some(PathBuf::from(v));
        }
        Ok(())
    }

    /// 校验配置值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "backend_url".to_string(),
                message: "不能为空".to_string(),
            });
        }
        if self.page_size < 1 {
            return Err(ConfigError::Invalid {
                key: "page_size".to_string(),
                message: "必须 >= 1".to_string(),
            });
        }
        if self.undo_window_minutes < 0 {
            return Err(ConfigError::Invalid {
                key: "undo_window_minutes".to_string(),
                message: "不能为负数".to_string(),
            });
        }
        if self.undo_window_minutes > MAX_UNDO_WINDOW_MINUTES {
            return Err(ConfigError::Invalid {
                key: "undo_window_minutes".to_string(),
                message: format!("不能超过 {}", MAX_UNDO_WINDOW_MINUTES),
            });
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.parse::<T>().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("无法解析为数字: {}", value),
    })
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

/// 默认数据目录（操作日志库、会话文件）
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 加载配置（进程环境变量覆写）
    pub fn load(config_path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// 加载配置（注入环境变量查找）
    ///
    /// # 参数
    /// - config_path: 显式配置文件；为 None 时使用默认路径，文件不存在则取默认值
    /// - lookup: 环境变量查找函数
    pub fn load_with_env<F>(config_path: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = config_path.is_some();
        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);

        let (mut config, source) = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(&p)?;
                (AppConfig::from_toml_str(&content)?, Some(p))
            }
            Some(p) if explicit => {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("配置文件不存在: {}", p.display()),
                )));
            }
            _ => {
                debug!("未找到配置文件，使用默认配置");
                (AppConfig::default(), None)
            }
        };

        config.apply_env(lookup)?;
        config.validate()?;

        info!(
            backend_url = %config.backend_url,
            page_size = config.page_size,
            source = ?source,
            "配置已加载"
        );
        Ok(Self { config, source })
    }

    /// 直接使用给定配置（校验后）
    pub fn from_config(config: AppConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 配置来源文件（使用默认值时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 覆写界面语言（命令行 --locale）
    pub fn override_locale(&mut self, locale: impl Into<String>) {
        self.config.locale = locale.into();
    }
}

impl ImportConfigReader for ConfigManager {
    fn backend_url(&self) -> &str {
        &self.config.backend_url
    }

    fn page_size(&self) -> usize {
        self.config.page_size
    }

    fn undo_window_minutes(&self) -> i64 {
        self.config.undo_window_minutes
    }

    fn request_timeout(&self) -> Option<Duration> {
        match self.config.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    fn locale(&self) -> &str {
        &self.config.locale
    }

    fn db_path(&self) -> PathBuf {
        self.config
            .db_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("action_log.db"))
    }

    fn session_path(&self) -> PathBuf {
        self.config
            .session_path
            .clone()
            .unwrap_or_else(|| default_data_dir().join("session.json"))
    }
}
