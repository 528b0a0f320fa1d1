use super::core::{ActionLogRepository, TS_FORMAT};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension, Result as SqliteResult, Row};

const SELECT_COLUMNS: &str = r#"
    SELECT action_id, action_type, action_ts, actor,
           file_name, success_count, skipped_count, detail
    FROM action_log
"#;

impl ActionLogRepository {
    // ==========================================
    // 查询操作
    // ==========================================

    /// 最近的操作日志（时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<ActionLog>> {
        let conn = self.get_conn()?;

        // 超出 i64 的 limit 视为不限
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let sql = format!("{} ORDER BY action_ts DESC, rowid DESC LIMIT ?", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let logs = stmt
            .query_map(params![limit], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(logs)
    }

    /// 指定类型的最新一条日志
    pub fn latest_by_type(&self, action_type: ActionType) -> RepositoryResult<Option<ActionLog>> {
        let conn = self.get_conn()?;

        let sql = format!(
            "{} WHERE action_type = ? ORDER BY action_ts DESC, rowid DESC LIMIT 1",
            SELECT_COLUMNS
        );
        let log = conn
            .query_row(&sql, params![action_type.as_str()], map_row)
            .optional()?;

        Ok(log)
    }

    /// 日志总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM action_log", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// 行映射
fn map_row(row: &Row) -> SqliteResult<ActionLog> {
    let action_type_str: String = row.get(1)?;
    let action_ts_str: String = row.get(2)?;

    let action_type = action_type_str.parse::<ActionType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            e.into(),
        )
    })?;

    let action_ts = NaiveDateTime::parse_from_str(&action_ts_str, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(ActionLog {
        action_id: row.get(0)?,
        action_type,
        action_ts,
        actor: row.get(3)?,
        file_name: row.get(4)?,
        success_count: row.get(5)?,
        skipped_count: row.get(6)?,
        detail: row.get(7)?,
    })
}
