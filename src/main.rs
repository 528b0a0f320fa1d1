// ==========================================
// 护理实习管理系统 - 名册导入命令行入口
// ==========================================

use std::process::ExitCode;

use clap::Parser;

use nu_roster_import::app::{self, AppState, Cli};
use nu_roster_import::config::{ConfigManager, ImportConfigReader};
use nu_roster_import::{i18n, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.log_json {
        logging::LogFormat::Json
    } else {
        logging::LogFormat::Text
    };
    logging::init(logging::level_for_verbosity(cli.verbose), format);

    tracing::info!("{} v{}", nu_roster_import::APP_NAME, nu_roster_import::VERSION);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("命令执行失败: {:#}", e);
            eprintln!("{}", app::operator_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = ConfigManager::load(cli.config.as_deref())?;
    if let Some(locale) = cli.locale {
        config.override_locale(locale);
    }
    i18n::set_locale(config.locale());

    let state = AppState::new(config)?;
    let mut stdout = std::io::stdout();
    app::run(&state, cli.command, &mut stdout).await
}
