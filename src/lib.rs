// ==========================================
// 护理实习管理系统 - 用户名册导入核心库
// ==========================================
// 流程: 解析 → 校验 → 预览/过滤 → 提交 → 对账 → 撤销
// 技术栈: Rust + reqwest + SQLite（本地操作日志）
// 系统定位: 管理员批量导入学生、带教老师与实习管理员账号
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 名册文件与导入流程
pub mod importer;

// API 层 - 远端后端
pub mod api;

// 会话与凭证
pub mod session;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 数据仓储层 - 操作日志
pub mod repository;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// 应用层 - 命令行
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AuthProvider, UserRole, ValidityFilter};

// 领域实体
pub use domain::{ActionLog, ActionType, ImportBatch, ImportOutcome, RowRecord, SkippedEntry};

// 导入流程
pub use importer::{ImportError, ImportSession, RoleRuleValidator, Submitter};

// API
pub use api::{HttpImportGateway, ImportGateway};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "护理实习管理系统 - 名册导入";
