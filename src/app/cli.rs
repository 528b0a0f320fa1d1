// ==========================================
// 护理实习管理系统 - 命令行定义
// ==========================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::domain::ValidityFilter;

#[derive(Debug, Parser)]
#[command(name = "nu-roster-import", version, about = "护理实习管理系统 - 用户名册导入")]
pub struct Cli {
    /// 配置文件路径（默认: <config_dir>/nu-roster-import/config.toml）
    #[arg(long, global = true, env = "NU_ROSTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// 界面语言: th | en | zh-CN
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// 日志详细程度（-v info, -vv debug, -vvv trace）
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// 以 JSON 输出日志
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 解析并预览名册文件（不提交）
    Preview {
        /// 名册文件 (.xlsx / .csv)
        file: PathBuf,

        /// 过滤: all | valid | invalid
        #[arg(long, default_value_t = ValidityFilter::All)]
        filter: ValidityFilter,

        /// 按姓名 / 邮箱 / 学号搜索（不区分大小写）
        #[arg(long, default_value = "")]
        search: String,

        /// 页码（从 1 开始，超出范围显示最后一页）
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// 提交名册中通过校验的行
    Import {
        file: PathBuf,

        /// 跳过确认
        #[arg(short, long)]
        yes: bool,
    },

    /// 撤销最近一次导入
    Undo {
        #[arg(short, long)]
        yes: bool,
    },

    /// 本机操作记录
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// 保存访问令牌
    Login {
        #[arg(long, env = "NU_ROSTER_TOKEN", hide_env_values = true)]
        token: String,

        #[arg(long)]
        email: Option<String>,

        /// 令牌有效期（分钟）；不填表示不过期
        #[arg(long)]
        expires_in_minutes: Option<i64>,
    },

    /// 删除本地会话
    Logout,
}
