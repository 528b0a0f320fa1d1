// ==========================================
// 护理实习管理系统 - 会话与凭证
// ==========================================
// 职责: 持有访问令牌与当前用户，供提交/撤销注入使用
// 存储: JSON 会话文件（登录时写入，登出时删除）
// ==========================================

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 会话错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("会话文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("会话文件格式错误: {0}")]
    Format(#[from] serde_json::Error),

    #[error("访问令牌为空")]
    EmptyToken,

    #[error("令牌有效期无效: {0} 分钟")]
    InvalidExpiry(i64),
}

pub type SessionResult<T> = Result<T, SessionError>;

// ==========================================
// SessionUser - 当前登录用户
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

// ==========================================
// SessionContext - 会话上下文
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<SessionUser>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionContext {
    pub fn new(access_token: impl Into<String>) -> SessionResult<Self> {
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self {
            access_token,
            user: None,
            expires_at: None,
        })
    }

    pub fn with_user(mut self, user: SessionUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// 从 now 起 minutes 分钟后过期；非正数或超出时间范围时报错
    pub fn expiring_in(self, minutes: i64, now: DateTime<Utc>) -> SessionResult<Self> {
        let expires_at = Some(minutes)
            .filter(|m| *m > 0)
            .and_then(Duration::try_minutes)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or(SessionError::InvalidExpiry(minutes))?;
        Ok(self.with_expiry(expires_at))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    /// 操作人标识（写入操作日志）
    pub fn actor(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.email.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// ==========================================
// CredentialProvider Trait
// ==========================================
// 用途: 向提交/撤销操作注入凭证（不使用全局状态）
// 实现者: SessionContext, Option<SessionContext>
pub trait CredentialProvider: Send + Sync {
    /// 有效的访问令牌；缺失或过期时返回 None
    fn access_token(&self) -> Option<String>;

    /// 当前用户（可能未知）
    fn current_user(&self) -> Option<SessionUser>;
}

impl CredentialProvider for SessionContext {
    fn access_token(&self) -> Option<String> {
        if self.is_expired_at(Utc::now()) {
            debug!("访问令牌已过期");
            return None;
        }
        Some(self.access_token.clone())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.user.clone()
    }
}

impl CredentialProvider for Option<SessionContext> {
    fn access_token(&self) -> Option<String> {
        self.as_ref().and_then(|s| s.access_token())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.as_ref().and_then(|s| s.current_user())
    }
}

// ==========================================
// SessionStore - 会话文件读写
// ==========================================
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取会话；文件不存在时返回 None
    pub fn load(&self) -> SessionResult<Option<SessionContext>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, session: &SessionContext) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(session)?;
        write_private(&self.path, body.as_bytes())?;
        info!(path = %self.path.display(), "会话已保存");
        Ok(())
    }

    /// 删除会话文件（登出）；不存在时视为成功
    pub fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "会话已清除");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// 会话文件含访问令牌，仅属主可读写
#[cfg(unix)]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // 已存在的文件不受 mode() 影响
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(body)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, body: &[u8]) -> std::io::Result<()> {
    fs::write(path, body)
}
