// ==========================================
// 护理实习管理系统 - 提交 / 对账 / 撤销
// ==========================================
// 流程:
// 1. 取凭证（缺失即中止，不发请求）
// 2. 仅提交通过校验的行
// 3. 按 skippedEmails 对账: 跳过 = 后端拒绝的行，成功 = 其余已提交行
// 4. 撤销前必须人工确认（凭证缺失时不询问）
// 策略: 不重试；任何传输/后端错误都视为整批失败
// ==========================================

use crate::api::{ImportGateway, ImportResponse, UndoResponse};
use crate::domain::{ImportBatch, ImportOutcome, RowRecord, SkippedEntry};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::roster_importer_trait::{Confirmer, RowValidator};
use crate::session::CredentialProvider;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// 对账：将后端返回的跳过列表合并回原始行
///
/// 不在已提交行中的跳过记录会被忽略，保证 成功 ∪ 跳过 == 已提交 且两者不相交
pub fn reconcile(
    file_name: &str,
    sent: Vec<RowRecord>,
    response: ImportResponse,
    imported_at: DateTime<Utc>,
) -> ImportOutcome {
    let sent_emails: HashSet<&str> = sent.iter().map(|r| r.email_key()).collect();

    let mut reasons: HashMap<String, String> = HashMap::new();
    for skipped in response.skipped_emails {
        if !sent_emails.contains(skipped.email.as_str()) {
            warn!(email = %skipped.email, "后端返回了未提交的邮箱，已忽略");
            continue;
        }
        reasons.insert(skipped.email, skipped.reason);
    }

    let mut success = Vec::new();
    let mut skipped = Vec::new();
    for row in sent {
        match reasons.get(row.email_key()) {
            Some(reason) => skipped.push(SkippedEntry::from_row(&row, reason.clone())),
            None => success.push(row),
        }
    }

    ImportOutcome {
        file_name: file_name.to_string(),
        success,
        skipped,
        imported_at,
    }
}

// ==========================================
// Submitter - 提交器
// ==========================================
pub struct Submitter<G: ImportGateway> {
    gateway: G,
    credentials: Arc<dyn CredentialProvider>,
}

impl<G: ImportGateway> Submitter<G> {
    /// # 参数
    /// - gateway: 远端导入接口
    /// - credentials: 会话凭证（显式注入）
    pub fn new(gateway: G, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn access_token(&self) -> ImportResult<String> {
        self.credentials
            .access_token()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ImportError::MissingCredential)
    }

    /// 提交批次中通过校验的行并对账
    #[instrument(skip_all, fields(file_name = %batch.file_name, rows = batch.len()))]
    pub async fn submit(
        &self,
        batch: &ImportBatch,
        validator: &dyn RowValidator,
    ) -> ImportResult<ImportOutcome> {
        let token = self.access_token()?;

        let sent: Vec<RowRecord> = batch
            .rows
            .iter()
            .filter(|row| validator.is_valid(row))
            .cloned()
            .collect();
        if sent.is_empty() {
            return Err(ImportError::NoValidRows);
        }
        info!(
            sent = sent.len(),
            excluded = batch.len() - sent.len(),
            "提交导入"
        );

        let response = self
            .gateway
            .import_users(&token, &sent)
            .await
            .map_err(|e| {
                error!(error = %e, "提交导入失败");
                ImportError::Submission(e)
            })?;

        let outcome = reconcile(&batch.file_name, sent, response, Utc::now());
        info!(
            success = outcome.success_count(),
            skipped = outcome.skipped_count(),
            "导入完成"
        );
        Ok(outcome)
    }

    /// 撤销最近一次导入（需确认）
    #[instrument(skip_all)]
    pub async fn undo(&self, confirmer: &dyn Confirmer, prompt: &str) -> ImportResult<UndoResponse> {
        let token = self.access_token()?;

        if !confirmer.confirm(prompt) {
            info!("操作人取消撤销");
            return Err(ImportError::UndoCancelled);
        }

        let response = self.gateway.undo_last_import(&token).await.map_err(|e| {
            error!(error = %e, "撤销导入失败");
            ImportError::Undo(e)
        })?;

        info!("撤销导入完成");
        Ok(response)
    }
}

// ==========================================
// UndoWindow - 撤销倒计时（仅展示，不做强制）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoWindow {
    pub imported_at: DateTime<Utc>,
    pub window: Duration,
}

impl UndoWindow {
    pub fn new(imported_at: DateTime<Utc>, window_minutes: i64) -> Self {
        // 超出 Duration 范围的分钟数按上限处理
        let window = Duration::try_minutes(window_minutes.max(0)).unwrap_or(Duration::MAX);
        Self {
            imported_at,
            window,
        }
    }

    /// 剩余时间；已过期返回 0
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        let elapsed = now.signed_duration_since(self.imported_at);
        self.window
            .checked_sub(&elapsed)
            .unwrap_or(Duration::MAX)
            .max(Duration::zero())
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now) > Duration::zero()
    }
}
