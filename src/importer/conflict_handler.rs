// ==========================================
// 护理实习管理系统 - 冲突处理器实现
// ==========================================
// 职责: 检测同批次内重复邮箱
// 策略: 任一重复即整批拒绝（由调用方执行）
// ==========================================

use crate::domain::RowRecord;
use crate::importer::roster_importer_trait::ConflictHandler as ConflictHandlerTrait;
use std::collections::HashSet;

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    /// 检测同批次内重复邮箱
    ///
    /// # 返回
    /// - Vec<String>: 重复邮箱，每个只报告一次（空邮箱不参与比较）
    fn detect_duplicate_emails(&self, records: &[RowRecord]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut reported: HashSet<&str> = HashSet::new();
        let mut duplicates = Vec::new();

        for record in records {
            let email = record.email_key();
            if email.is_empty() {
                continue;
            }
            if !seen.insert(email) && reported.insert(email) {
                duplicates.push(email.to_string());
            }
        }

        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: Option<&str>, row_number: usize) -> RowRecord {
        RowRecord {
            email: email.map(str::to_string),
            row_number,
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_duplicates_none() {
        let records = vec![record(Some("a@nu.ac.th"), 2), record(Some("b@nu.ac.th"), 3)];
        assert!(ConflictHandler.detect_duplicate_emails(&records).is_empty());
    }

    #[test]
    fn test_detect_duplicates_reported_once() {
        let records = vec![
            record(Some("dup@nu.ac.th"), 2),
            record(Some("ok@nu.ac.th"), 3),
            record(Some("dup@nu.ac.th"), 4),
            record(Some("dup@nu.ac.th"), 5),
        ];
        assert_eq!(
            ConflictHandler.detect_duplicate_emails(&records),
            vec!["dup@nu.ac.th".to_string()]
        );
    }

    #[test]
    fn test_detect_duplicates_detection_order() {
        let records = vec![
            record(Some("b@nu.ac.th"), 2),
            record(Some("a@nu.ac.th"), 3),
            record(Some("a@nu.ac.th"), 4),
            record(Some("b@nu.ac.th"), 5),
        ];
        assert_eq!(
            ConflictHandler.detect_duplicate_emails(&records),
            vec!["a@nu.ac.th".to_string(), "b@nu.ac.th".to_string()]
        );
    }

    #[test]
    fn test_blank_emails_not_duplicates() {
        let records = vec![record(None, 2), record(None, 3)];
        assert!(ConflictHandler.detect_duplicate_emails(&records).is_empty());
    }
}
