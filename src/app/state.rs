// ==========================================
// 护理实习管理系统 - 应用状态
// ==========================================
// 职责: 管理命令共享的配置、会话文件与操作日志库
// ==========================================

use std::sync::Arc;

use anyhow::Context;

use crate::api::HttpImportGateway;
use crate::config::{ConfigManager, ImportConfigReader};
use crate::importer::{ImportSession, Submitter};
use crate::repository::ActionLogRepository;
use crate::session::{CredentialProvider, SessionContext, SessionStore};

/// 应用状态
///
/// 每次命令执行构建一次；提交器按需创建（会话可能在两次命令之间变化）
pub struct AppState {
    /// 配置
    pub config: ConfigManager,

    /// 会话文件
    pub session_store: SessionStore,

    /// 操作日志仓储
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    pub fn new(config: ConfigManager) -> anyhow::Result<Self> {
        let db_path = config.db_path();
        tracing::info!("初始化AppState，数据库路径: {}", db_path.display());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建数据目录: {}", parent.display()))?;
        }
        let action_log_repo = Arc::new(
            ActionLogRepository::open(&db_path)
                .with_context(|| format!("无法打开操作日志库: {}", db_path.display()))?,
        );

        let session_store = SessionStore::new(config.session_path());

        Ok(Self {
            config,
            session_store,
            action_log_repo,
        })
    }

    /// 当前会话（未登录时为 None）
    pub fn session(&self) -> anyhow::Result<Option<SessionContext>> {
        self.session_store
            .load()
            .with_context(|| format!("无法读取会话文件: {}", self.session_store.path().display()))
    }

    /// 操作人（写入操作日志）
    pub fn actor(&self) -> String {
        self.session()
            .ok()
            .flatten()
            .map(|s| s.actor())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// 新建导入会话（页大小取自配置）
    pub fn import_session(&self) -> ImportSession {
        ImportSession::new(self.config.page_size())
    }

    /// 基于当前会话构建提交器
    pub fn submitter(&self) -> anyhow::Result<Submitter<HttpImportGateway>> {
        let gateway = HttpImportGateway::new(
            self.config.backend_url(),
            self.config.request_timeout(),
        )?;
        let credentials: Arc<dyn CredentialProvider> = Arc::new(self.session()?);
        Ok(Submitter::new(gateway, credentials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> AppState {
        let config = AppConfig {
            db_path: Some(dir.path().join("data").join("log.db")),
            session_path: Some(dir.path().join("session.json")),
            ..AppConfig::default()
        };
        AppState::new(ConfigManager::from_config(config).unwrap()).unwrap()
    }

    #[test]
    fn test_new_creates_database_directory() {
        let dir = TempDir::new().unwrap();
        let _state = test_state(&dir);
        assert!(dir.path().join("data").join("log.db").exists());
    }

    #[test]
    fn test_actor_without_session() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        assert!(state.session().unwrap().is_none());
        assert_eq!(state.actor(), "unknown");
    }

    #[test]
    fn test_submitter_without_session_builds() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let submitter = state.submitter().unwrap();
        assert_eq!(submitter.gateway().base_url(), "http://localhost:3000");
    }
}
