// ==========================================
// 护理实习管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入流程所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use std::path::PathBuf;
use std::time::Duration;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（TOML + 环境变量）
pub trait ImportConfigReader: Send + Sync {
    /// 后端地址（不含末尾 /）
    ///
    /// # 默认值
    /// - http://localhost:3000
    fn backend_url(&self) -> &str;

    /// 预览每页行数
    ///
    /// # 默认值
    /// - 10
    fn page_size(&self) -> usize;

    /// 撤销倒计时时长（分钟），仅用于展示
    ///
    /// # 默认值
    /// - 30
    fn undo_window_minutes(&self) -> i64;

    /// 请求超时；None 表示不限
    ///
    /// # 默认值
    /// - 30 秒
    fn request_timeout(&self) -> Option<Duration>;

    /// 界面语言
    ///
    /// # 默认值
    /// - th
    fn locale(&self) -> &str;

    /// 操作日志库路径
    fn db_path(&self) -> PathBuf;

    /// 会话文件路径
    fn session_path(&self) -> PathBuf;
}
