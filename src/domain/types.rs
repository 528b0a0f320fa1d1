// ==========================================
// 护理实习管理系统 - 领域类型定义
// ==========================================
// 职责: 用户角色 / 登录方式 / 预览过滤条件
// 序列化格式: SCREAMING_SNAKE_CASE (与后端接口一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 用户角色 (User Role)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,           // 学生
    ApproverIn,        // 校内审批人
    ApproverOut,       // 校外审批人
    ExperienceManager, // 实习经历管理员
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Student,
        UserRole::ApproverIn,
        UserRole::ApproverOut,
        UserRole::ExperienceManager,
    ];

    /// 角色对应的默认登录方式
    ///
    /// 校内账号走 Google SSO，校外账号走本地密码
    pub fn default_provider(&self) -> AuthProvider {
        match self {
            UserRole::Student | UserRole::ApproverIn => AuthProvider::Google,
            UserRole::ApproverOut | UserRole::ExperienceManager => AuthProvider::Local,
        }
    }

    /// 是否要求导入时提供密码
    pub fn requires_password(&self) -> bool {
        matches!(self, UserRole::ApproverOut | UserRole::ExperienceManager)
    }

    /// 是否要求校内邮箱
    pub fn requires_campus_email(&self) -> bool {
        matches!(self, UserRole::Student | UserRole::ApproverIn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::ApproverIn => "APPROVER_IN",
            UserRole::ApproverOut => "APPROVER_OUT",
            UserRole::ExperienceManager => "EXPERIENCE_MANAGER",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STUDENT" => Ok(UserRole::Student),
            "APPROVER_IN" => Ok(UserRole::ApproverIn),
            "APPROVER_OUT" => Ok(UserRole::ApproverOut),
            "EXPERIENCE_MANAGER" => Ok(UserRole::ExperienceManager),
            other => Err(format!("未知角色: {}", other)),
        }
    }
}

// ==========================================
// 登录方式 (Auth Provider)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthProvider {
    Google, // Google SSO
    Local,  // 本地账号密码
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Google => "GOOGLE",
            AuthProvider::Local => "LOCAL",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 预览过滤条件 (Validity Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityFilter {
    #[default]
    All,
    Valid,
    Invalid,
}

impl ValidityFilter {
    /// 判断某行的校验结果是否满足过滤条件
    pub fn accepts(&self, is_valid: bool) -> bool {
        match self {
            ValidityFilter::All => true,
            ValidityFilter::Valid => is_valid,
            ValidityFilter::Invalid => !is_valid,
        }
    }
}

impl fmt::Display for ValidityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidityFilter::All => write!(f, "all"),
            ValidityFilter::Valid => write!(f, "valid"),
            ValidityFilter::Invalid => write!(f, "invalid"),
        }
    }
}

impl FromStr for ValidityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ValidityFilter::All),
            "valid" => Ok(ValidityFilter::Valid),
            "invalid" => Ok(ValidityFilter::Invalid),
            other => Err(format!("未知过滤条件: {}", other)),
        }
    }
}
