// ==========================================
// 护理实习管理系统 - 命令处理
// ==========================================
// 职责: 将命令行子命令映射到导入流程，输出表格与本地化提示
// 红线: 输出与日志中不出现密码
// ==========================================

use std::io::Write;
use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::ApiError;
use crate::app::cli::Command;
use crate::app::prompt::{AutoConfirm, Confirmer, TerminalConfirmer};
use crate::app::state::AppState;
use crate::config::ImportConfigReader;
use crate::domain::{ActionLog, ActionType, ImportOutcome, ValidityFilter};
use crate::i18n::{t, t_with_args};
use crate::importer::{ImportError, PreviewPage, UndoWindow};
use crate::session::{CredentialProvider, SessionContext, SessionUser};

/// 执行子命令
pub async fn run<W: Write>(state: &AppState, command: Command, out: &mut W) -> anyhow::Result<()> {
    match command {
        Command::Preview {
            file,
            filter,
            search,
            page,
        } => preview(state, &file, filter, &search, page, out),
        Command::Import { file, yes } => {
            let confirmer = confirmer_for(yes);
            import(state, &file, confirmer.as_ref(), out).await
        }
        Command::Undo { yes } => {
            let confirmer = confirmer_for(yes);
            undo(state, confirmer.as_ref(), out).await
        }
        Command::History { limit } => history(state, limit, out),
        Command::Login {
            token,
            email,
            expires_in_minutes,
        } => login(state, &token, email, expires_in_minutes, out),
        Command::Logout => logout(state, out),
    }
}

fn confirmer_for(yes: bool) -> Box<dyn Confirmer> {
    if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(TerminalConfirmer)
    }
}

// ==========================================
// 错误提示
// ==========================================

/// 命令失败时展示给操作人的单行提示
pub fn operator_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ImportError>() {
        Some(e) => import_error_message(e),
        None => format!("{:#}", err),
    }
}

pub fn import_error_message(err: &ImportError) -> String {
    match err {
        ImportError::MissingCredential => t("error.missing_credential"),
        ImportError::NoValidRows => t("error.no_valid_rows"),
        ImportError::UndoCancelled => t("common.cancelled"),
        ImportError::DuplicateEmails(emails) => {
            t_with_args("error.duplicate_emails", &[("emails", &emails.join(", "))])
        }
        ImportError::FileNotFound(path) => t_with_args("import.file_not_found", &[("path", path)]),
        ImportError::Submission(e) => {
            t_with_args("error.import_failed", &[("message", &server_or_generic(e))])
        }
        ImportError::Undo(e) => t_with_args("error.undo_failed", &[("message", &server_or_generic(e))]),
        other => other.to_string(),
    }
}

/// 后端给出的提示优先，否则使用通用提示
fn server_or_generic(err: &ApiError) -> String {
    err.server_message()
        .map(str::to_string)
        .unwrap_or_else(|| t("error.generic"))
}

// ==========================================
// 表格输出
// ==========================================

fn write_table<W: Write>(out: &mut W, headers: &[String], rows: &[Vec<String>]) -> std::io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", line(headers))?;
    writeln!(
        out,
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    )?;
    for row in rows {
        writeln!(out, "{}", line(row))?;
    }
    Ok(())
}

fn header(key: &str) -> String {
    t(&format!("preview.header.{}", key))
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn write_preview<W: Write>(out: &mut W, page: &PreviewPage<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        t_with_args(
            "preview.summary",
            &[
                ("valid", &page.valid_count.to_string()),
                ("invalid", &page.invalid_count.to_string()),
                ("total", &page.total.to_string()),
            ],
        )
    )?;

    if page.rows.is_empty() {
        return writeln!(out, "{}", t("preview.empty"));
    }

    let headers: Vec<String> = ["row", "name", "email", "role", "student_id", "provider", "status"]
        .iter()
        .map(|k| header(k))
        .collect();
    let rows: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|r| {
            let status = if r.is_valid() {
                t("preview.valid")
            } else {
                r.violations
                    .iter()
                    .map(|v| t(v.message_key()))
                    .collect::<Vec<_>>()
                    .join("; ")
            };
            vec![
                r.row.row_number.to_string(),
                r.row.display_name(),
                opt(&r.row.email),
                opt(&r.row.role),
                opt(&r.row.student_id),
                opt(&r.row.provider),
                status,
            ]
        })
        .collect();
    write_table(out, &headers, &rows)?;

    writeln!(
        out,
        "{}",
        t_with_args(
            "preview.page",
            &[
                ("page", &page.page.to_string()),
                ("pages", &page.total_pages.to_string()),
                ("matched", &page.matched.to_string()),
            ],
        )
    )
}

fn write_outcome<W: Write>(out: &mut W, outcome: &ImportOutcome) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        t_with_args("import.success_title", &[("count", &outcome.success_count().to_string())])
    )?;
    if !outcome.success.is_empty() {
        let headers: Vec<String> = ["name", "email", "role", "student_id"]
            .iter()
            .map(|k| header(k))
            .collect();
        let rows: Vec<Vec<String>> = outcome
            .success
            .iter()
            .map(|r| {
                vec![
                    r.display_name(),
                    opt(&r.email),
                    opt(&r.role),
                    opt(&r.student_id),
                ]
            })
            .collect();
        write_table(out, &headers, &rows)?;
    }

    writeln!(
        out,
        "{}",
        t_with_args("import.skipped_title", &[("count", &outcome.skipped_count().to_string())])
    )?;
    if !outcome.skipped.is_empty() {
        let headers: Vec<String> = ["name", "email", "student_id", "reason"]
            .iter()
            .map(|k| header(k))
            .collect();
        let rows: Vec<Vec<String>> = outcome
            .skipped
            .iter()
            .map(|s| {
                vec![
                    s.display_name.clone(),
                    s.email.clone(),
                    opt(&s.student_id),
                    s.reason.clone(),
                ]
            })
            .collect();
        write_table(out, &headers, &rows)?;
    }
    Ok(())
}

// ==========================================
// 预览
// ==========================================

pub fn preview<W: Write>(
    state: &AppState,
    file: &Path,
    filter: ValidityFilter,
    search: &str,
    page: usize,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut session = state.import_session();
    let rows = session.load_file(file)?.len();
    writeln!(
        out,
        "{}",
        t_with_args(
            "import.loaded",
            &[("rows", &rows.to_string()), ("file", session.file_name().unwrap_or_default())],
        )
    )?;

    session.set_filter(filter);
    session.set_search(search);
    session.set_page(page);
    write_preview(out, &session.preview())?;
    Ok(())
}

// ==========================================
// 导入
// ==========================================

pub async fn import<W: Write>(
    state: &AppState,
    file: &Path,
    confirmer: &dyn Confirmer,
    out: &mut W,
) -> anyhow::Result<()> {
    // 凭证缺失时不解析、不询问
    if state.session()?.access_token().is_none() {
        return Err(ImportError::MissingCredential.into());
    }

    let mut session = state.import_session();
    let rows = session.load_file(file)?.len();
    let file_name = session.file_name().unwrap_or_default().to_string();
    writeln!(
        out,
        "{}",
        t_with_args("import.loaded", &[("rows", &rows.to_string()), ("file", &file_name)])
    )?;

    let valid_count = {
        let page = session.preview();
        write_preview(out, &page)?;
        page.valid_count
    };
    if valid_count == 0 {
        return Err(ImportError::NoValidRows.into());
    }

    let prompt = t_with_args(
        "import.confirm",
        &[("count", &valid_count.to_string()), ("file", &file_name)],
    );
    if !confirmer.confirm(&prompt) {
        writeln!(out, "{}", t("common.cancelled"))?;
        return Ok(());
    }

    writeln!(out, "{}", t_with_args("import.sending", &[("count", &valid_count.to_string())]))?;
    let submitter = state.submitter()?;
    let outcome = session.submit(&submitter).await?;
    write_outcome(out, outcome)?;

    let log = ActionLog {
        action_id: Uuid::new_v4().to_string(),
        action_type: ActionType::Import,
        action_ts: outcome.imported_at.naive_utc(),
        actor: state.actor(),
        file_name: Some(outcome.file_name.clone()),
        success_count: i64::try_from(outcome.success_count()).unwrap_or(i64::MAX),
        skipped_count: i64::try_from(outcome.skipped_count()).unwrap_or(i64::MAX),
        detail: None,
    };
    record(state, &log);
    Ok(())
}

/// 写操作日志；失败只告警，不影响已完成的远端操作
fn record(state: &AppState, log: &ActionLog) {
    match state.action_log_repo.insert(log) {
        Ok(id) => info!(action_id = %id, action_type = %log.action_type, "操作日志已记录"),
        Err(e) => warn!(error = %e, "操作日志写入失败"),
    }
}

// ==========================================
// 撤销
// ==========================================

/// 撤销倒计时（基于本机最近一次未撤销的导入）
pub fn undo_window(state: &AppState) -> anyhow::Result<Option<UndoWindow>> {
    let Some(last_import) = state.action_log_repo.latest_by_type(ActionType::Import)? else {
        return Ok(None);
    };
    if let Some(last_undo) = state.action_log_repo.latest_by_type(ActionType::UndoImport)? {
        if last_undo.action_ts >= last_import.action_ts {
            return Ok(None);
        }
    }
    Ok(Some(UndoWindow::new(
        last_import.action_ts.and_utc(),
        state.config.undo_window_minutes(),
    )))
}

fn write_undo_window<W: Write>(out: &mut W, window: Option<UndoWindow>) -> std::io::Result<()> {
    let Some(window) = window else {
        return writeln!(out, "{}", t("undo.no_history"));
    };

    let now = Utc::now();
    if !window.is_open(now) {
        return writeln!(out, "{}", t("undo.window_elapsed"));
    }
    let remaining = window.remaining(now);
    let minutes = remaining.num_minutes();
    let seconds = remaining.num_seconds() % 60;
    writeln!(
        out,
        "{}",
        t_with_args(
            "undo.countdown",
            &[("minutes", &minutes.to_string()), ("seconds", &seconds.to_string())],
        )
    )
}

pub async fn undo<W: Write>(
    state: &AppState,
    confirmer: &dyn Confirmer,
    out: &mut W,
) -> anyhow::Result<()> {
    write_undo_window(out, undo_window(state)?)?;

    let submitter = state.submitter()?;
    let response = match submitter.undo(confirmer, &t("undo.confirm")).await {
        Ok(response) => response,
        Err(ImportError::UndoCancelled) => {
            writeln!(out, "{}", t("common.cancelled"))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let log = ActionLog {
        action_id: Uuid::new_v4().to_string(),
        action_type: ActionType::UndoImport,
        action_ts: Utc::now().naive_utc(),
        actor: state.actor(),
        file_name: None,
        success_count: 0,
        skipped_count: 0,
        detail: response.message.clone(),
    };
    record(state, &log);

    writeln!(out, "{}", t("undo.success"))?;
    if let Some(message) = response.message {
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

// ==========================================
// 操作记录 / 会话
// ==========================================

pub fn history<W: Write>(state: &AppState, limit: usize, out: &mut W) -> anyhow::Result<()> {
    let logs = state.action_log_repo.list_recent(limit)?;
    if logs.is_empty() {
        writeln!(out, "{}", t("history.empty"))?;
        return Ok(());
    }
    let shown = logs.len();

    writeln!(out, "{}", t("history.header"))?;
    for log in logs {
        writeln!(
            out,
            "{} | {} | {} | {} | {} | {}",
            log.action_ts.format("%Y-%m-%d %H:%M:%S"),
            log.action_type,
            log.actor,
            log.file_name.as_deref().unwrap_or("-"),
            log.success_count,
            log.skipped_count,
        )?;
    }
    let total = state.action_log_repo.count()?;
    if i64::try_from(shown).is_ok_and(|shown| total > shown) {
        writeln!(
            out,
            "{}",
            t_with_args(
                "history.truncated",
                &[("shown", &shown.to_string()), ("total", &total.to_string())],
            )
        )?;
    }
    Ok(())
}

pub fn login<W: Write>(
    state: &AppState,
    token: &str,
    email: Option<String>,
    expires_in_minutes: Option<i64>,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut session = SessionContext::new(token)?;
    if let Some(email) = email {
        session = session.with_user(SessionUser {
            email,
            id: None,
            role: None,
        });
    }
    if let Some(minutes) = expires_in_minutes {
        session = session.expiring_in(minutes, Utc::now())?;
    }
    state.session_store.save(&session)?;

    let who = session
        .user
        .as_ref()
        .map(|u| u.email.clone())
        .unwrap_or_else(|| t("common.unknown"));
    writeln!(out, "{}", t_with_args("session.login_ok", &[("email", &who)]))?;
    Ok(())
}

pub fn logout<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    state.session_store.clear()?;
    writeln!(out, "{}", t("session.logout_ok"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ConfigManager};
    use crate::session::SessionError;
    use chrono::Duration;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> AppState {
        let config = AppConfig {
            db_path: Some(dir.path().join("log.db")),
            session_path: Some(dir.path().join("session.json")),
            ..AppConfig::default()
        };
        AppState::new(ConfigManager::from_config(config).unwrap()).unwrap()
    }

    fn write_csv(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("roster.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_preview_filters_invalid_rows() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let file = write_csv(
            &dir,
            "name,email,role,studentId\n\
             Ann,ann@nu.ac.th,STUDENT,12345678\n\
             Bob,bob@gmail.com,STUDENT,12345679\n",
        );

        let mut out = Vec::new();
        preview(&state, &file, ValidityFilter::Invalid, "", 1, &mut out).unwrap();
        let text = output(out);

        assert!(text.contains("bob@gmail.com"));
        assert!(!text.contains("ann@nu.ac.th"));
    }

    #[test]
    fn test_preview_duplicate_emails_is_error() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let file = write_csv(
            &dir,
            "name,email,role\nA,dup@nu.ac.th,STUDENT\nB,dup@nu.ac.th,STUDENT\n",
        );

        let mut out = Vec::new();
        let err = preview(&state, &file, ValidityFilter::All, "", 1, &mut out).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::DuplicateEmails(emails)) if emails == &vec!["dup@nu.ac.th".to_string()]
        ));
        assert!(operator_message(&err).contains("dup@nu.ac.th"));
    }

    #[tokio::test]
    async fn test_import_without_session_is_missing_credential() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let file = write_csv(&dir, "name,email,role,studentId\nAnn,ann@nu.ac.th,STUDENT,12345678\n");

        let mut out = Vec::new();
        let err = import(&state, &file, &AutoConfirm(true), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::MissingCredential)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_login_logout_roundtrip() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let mut out = Vec::new();
        login(&state, "tok", Some("admin@nu.ac.th".to_string()), Some(60), &mut out).unwrap();
        assert!(output(out).contains("admin@nu.ac.th"));
        assert_eq!(state.actor(), "admin@nu.ac.th");
        assert!(state.session().unwrap().access_token().is_some());

        let mut out = Vec::new();
        logout(&state, &mut out).unwrap();
        assert!(state.session().unwrap().is_none());
    }

    #[test]
    fn test_login_rejects_blank_token() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let mut out = Vec::new();
        assert!(login(&state, "  ", None, None, &mut out).is_err());
    }

    #[test]
    fn test_login_rejects_out_of_range_expiry() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        for minutes in [i64::MAX, 0, -5] {
            let mut out = Vec::new();
            let err = login(&state, "tok", None, Some(minutes), &mut out).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<SessionError>(),
                Some(SessionError::InvalidExpiry(m)) if *m == minutes
            ));
        }
        // 失败时不写会话文件
        assert!(state.session().unwrap().is_none());
    }

    #[test]
    fn test_undo_window_tracks_last_import() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        assert!(undo_window(&state).unwrap().is_none());

        let now = Utc::now().naive_utc();
        let import_log = ActionLog {
            action_id: "a1".to_string(),
            action_type: ActionType::Import,
            action_ts: now - Duration::minutes(5),
            actor: "admin@nu.ac.th".to_string(),
            file_name: Some("roster.csv".to_string()),
            success_count: 3,
            skipped_count: 0,
            detail: None,
        };
        state.action_log_repo.insert(&import_log).unwrap();

        let window = undo_window(&state).unwrap().unwrap();
        assert!(window.is_open(Utc::now()));

        let undo_log = ActionLog {
            action_id: "a2".to_string(),
            action_type: ActionType::UndoImport,
            action_ts: now,
            file_name: None,
            success_count: 0,
            ..import_log
        };
        state.action_log_repo.insert(&undo_log).unwrap();
        assert!(undo_window(&state).unwrap().is_none());
    }

    #[test]
    fn test_history_lists_entries() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state
            .action_log_repo
            .insert(&ActionLog {
                action_id: "h1".to_string(),
                action_type: ActionType::Import,
                action_ts: Utc::now().naive_utc(),
                actor: "admin@nu.ac.th".to_string(),
                file_name: Some("roster.xlsx".to_string()),
                success_count: 4,
                skipped_count: 1,
                detail: None,
            })
            .unwrap();

        let mut out = Vec::new();
        history(&state, 10, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("IMPORT"));
        assert!(text.contains("roster.xlsx"));
        assert!(!text.contains("1/1"));
    }

    #[test]
    fn test_history_reports_truncation() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let now = Utc::now().naive_utc();
        for i in 0..3 {
            state
                .action_log_repo
                .insert(&ActionLog {
                    action_id: format!("h{}", i),
                    action_type: ActionType::Import,
                    action_ts: now - Duration::minutes(i),
                    actor: "admin@nu.ac.th".to_string(),
                    file_name: None,
                    success_count: 1,
                    skipped_count: 0,
                    detail: None,
                })
                .unwrap();
        }

        let mut out = Vec::new();
        history(&state, 2, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("2/3"));

        let mut out = Vec::new();
        history(&state, 5, &mut out).unwrap();
        assert!(!output(out).contains("3/3"));
    }

    #[test]
    fn test_write_table_aligns_columns() {
        let mut out = Vec::new();
        write_table(
            &mut out,
            &["a".to_string(), "bb".to_string()],
            &[vec!["xyz".to_string(), "1".to_string()]],
        )
        .unwrap();
        let text = output(out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "a   | bb");
        assert_eq!(lines[1], "----+---");
        assert_eq!(lines[2], "xyz | 1");
    }
}
