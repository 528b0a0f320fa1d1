use super::ActionLogRepository;
use crate::domain::action_log::{ActionLog, ActionType};
use chrono::{Duration, NaiveDateTime, Utc};
use std::sync::{Arc, Mutex};

fn setup_repo() -> ActionLogRepository {
    let conn = crate::db::open_in_memory().unwrap();
    ActionLogRepository::new(Arc::new(Mutex::new(conn)))
}

fn make_test_log(action_id: &str, action_type: ActionType, action_ts: NaiveDateTime) -> ActionLog {
    ActionLog {
        action_id: action_id.to_string(),
        action_type,
        action_ts,
        actor: "admin@nu.ac.th".to_string(),
        file_name: Some("roster.xlsx".to_string()),
        success_count: 2,
        skipped_count: 1,
        detail: None,
    }
}

fn now_secs() -> NaiveDateTime {
    // 存储精度为秒
    let now = Utc::now().naive_utc();
    NaiveDateTime::parse_from_str(&now.format("%Y-%m-%d %H:%M:%S").to_string(), "%Y-%m-%d %H:%M:%S")
        .unwrap()
}

#[test]
fn test_insert_and_list_recent() {
    let repo = setup_repo();
    let log = make_test_log("log1", ActionType::Import, now_secs());

    assert_eq!(repo.insert(&log).unwrap(), "log1");

    let logs = repo.list_recent(10).unwrap();
    assert_eq!(logs, vec![log]);
}

#[test]
fn test_list_recent_orders_newest_first_and_limits() {
    let repo = setup_repo();
    let base = now_secs();
    for i in 0..5 {
        let log = make_test_log(&format!("log{}", i), ActionType::Import, base + Duration::minutes(i));
        repo.insert(&log).unwrap();
    }

    let logs = repo.list_recent(3).unwrap();
    let ids: Vec<&str> = logs.iter().map(|l| l.action_id.as_str()).collect();
    assert_eq!(ids, vec!["log4", "log3", "log2"]);
    assert_eq!(repo.count().unwrap(), 5);
}

#[test]
fn test_list_recent_huge_limit_returns_all() {
    let repo = setup_repo();
    let base = now_secs();
    for i in 0..3 {
        let log = make_test_log(&format!("log{}", i), ActionType::Import, base + Duration::minutes(i));
        repo.insert(&log).unwrap();
    }

    let logs = repo.list_recent(usize::MAX).unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(logs[0].action_id, "log2");
    assert!(repo.list_recent(0).unwrap().is_empty());
}

#[test]
fn test_latest_by_type() {
    let repo = setup_repo();
    let base = now_secs();
    repo.insert(&make_test_log("imp1", ActionType::Import, base)).unwrap();
    repo.insert(&make_test_log("imp2", ActionType::Import, base + Duration::minutes(5)))
        .unwrap();
    repo.insert(&make_test_log("undo1", ActionType::UndoImport, base + Duration::minutes(6)))
        .unwrap();

    let latest_import = repo.latest_by_type(ActionType::Import).unwrap().unwrap();
    assert_eq!(latest_import.action_id, "imp2");

    let latest_undo = repo.latest_by_type(ActionType::UndoImport).unwrap().unwrap();
    assert_eq!(latest_undo.action_id, "undo1");
}

#[test]
fn test_latest_by_type_empty() {
    let repo = setup_repo();
    assert!(repo.latest_by_type(ActionType::Import).unwrap().is_none());
}

#[test]
fn test_duplicate_action_id_rejected() {
    let repo = setup_repo();
    let log = make_test_log("same", ActionType::Import, now_secs());
    repo.insert(&log).unwrap();
    assert!(repo.insert(&log).is_err());
}
