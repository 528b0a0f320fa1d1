// ==========================================
// 护理实习管理系统 - 导入会话
// ==========================================
// 职责: 独占持有一次上传的批次、预览条件与最近一次导入结果
// 生命周期:
// - 选择文件 → 创建批次（重复邮箱则整批拒绝，旧批次保持不变）
// - 过滤 / 搜索 / 翻页 → 只读投影
// - 提交成功 → 清空批次；提交失败 → 批次保持不变
// - 撤销成功 → 清空导入结果；撤销失败 → 结果保持不变
// 并发: 所有变更都经 &mut self，一个会话不可能同时有两次提交
// ==========================================

use crate::api::ImportGateway;
use crate::domain::{ImportBatch, ImportOutcome, RowRecord, ValidityFilter};
use crate::importer::conflict_handler::ConflictHandler as DefaultConflictHandler;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as DefaultFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::preview::{self, PreviewPage, PreviewQuery};
use crate::importer::roster_importer_trait::{
    ConflictHandler, Confirmer, FieldMapper, FileParser, RawRow, RowValidator,
};
use crate::importer::row_validator::RoleRuleValidator;
use crate::importer::submitter::Submitter;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

pub struct ImportSession {
    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    conflict_handler: Box<dyn ConflictHandler>,
    validator: Box<dyn RowValidator>,

    // 会话状态
    batch: Option<ImportBatch>,
    query: PreviewQuery,
    outcome: Option<ImportOutcome>,
}

impl ImportSession {
    /// 使用默认组件创建会话
    pub fn new(page_size: usize) -> Self {
        Self::with_components(
            Box::new(UniversalFileParser),
            Box::new(DefaultFieldMapper),
            Box::new(DefaultConflictHandler),
            Box::new(RoleRuleValidator),
            page_size,
        )
    }

    pub fn with_components(
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        conflict_handler: Box<dyn ConflictHandler>,
        validator: Box<dyn RowValidator>,
        page_size: usize,
    ) -> Self {
        Self {
            file_parser,
            field_mapper,
            conflict_handler,
            validator,
            batch: None,
            query: PreviewQuery::with_page_size(page_size),
            outcome: None,
        }
    }

    // ==========================================
    // 批次
    // ==========================================

    /// 解析文件并替换当前批次
    #[instrument(skip(self, file_path), fields(file = %file_path.as_ref().display()))]
    pub fn load_file<P: AsRef<Path>>(&mut self, file_path: P) -> ImportResult<&ImportBatch> {
        let path = file_path.as_ref();
        let raw_rows = self.file_parser.parse_to_raw_records(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.load_raw_rows(file_name, raw_rows)
    }

    /// 从原始行创建批次（映射 + 重复检测）
    pub fn load_raw_rows(
        &mut self,
        file_name: impl Into<String>,
        raw_rows: Vec<RawRow>,
    ) -> ImportResult<&ImportBatch> {
        let file_name = file_name.into();
        let records: Vec<RowRecord> = raw_rows
            .into_iter()
            .map(|row| self.field_mapper.map_to_row_record(row))
            .collect();
        debug!(rows = records.len(), "字段映射完成");

        let duplicates = self.conflict_handler.detect_duplicate_emails(&records);
        if !duplicates.is_empty() {
            warn!(duplicates = duplicates.len(), file_name = %file_name, "邮箱重复，整批拒绝");
            return Err(ImportError::DuplicateEmails(duplicates));
        }

        info!(rows = records.len(), file_name = %file_name, "批次已载入");
        self.query.page = 1;
        Ok(self.batch.insert(ImportBatch::new(file_name, records)))
    }

    pub fn batch(&self) -> Option<&ImportBatch> {
        self.batch.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.batch.as_ref().map(|b| b.file_name.as_str())
    }

    /// 移除当前批次（回到上传步骤）
    pub fn remove_batch(&mut self) {
        self.batch = None;
        self.query.page = 1;
    }

    // ==========================================
    // 预览
    // ==========================================

    pub fn query(&self) -> &PreviewQuery {
        &self.query
    }

    /// 变更过滤条件，页码回到 1
    pub fn set_filter(&mut self, filter: ValidityFilter) {
        self.query.filter = filter;
        self.query.page = 1;
    }

    /// 变更搜索词，页码回到 1
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.query.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn preview(&self) -> PreviewPage<'_> {
        let rows: &[RowRecord] = self.batch.as_ref().map(|b| b.rows.as_slice()).unwrap_or(&[]);
        preview::project(rows, self.validator.as_ref(), &self.query)
    }

    pub fn validator(&self) -> &dyn RowValidator {
        self.validator.as_ref()
    }

    // ==========================================
    // 提交 / 撤销
    // ==========================================

    pub fn outcome(&self) -> Option<&ImportOutcome> {
        self.outcome.as_ref()
    }

    /// 提交当前批次；成功后清空批次并保存结果
    pub async fn submit<G: ImportGateway>(
        &mut self,
        submitter: &Submitter<G>,
    ) -> ImportResult<&ImportOutcome> {
        let batch = self.batch.as_ref().ok_or(ImportError::NoBatch)?;
        let outcome = submitter.submit(batch, self.validator.as_ref()).await?;

        self.batch = None;
        self.query.page = 1;
        Ok(self.outcome.insert(outcome))
    }

    /// 撤销最近一次导入；成功后清空本地结果
    pub async fn undo<G: ImportGateway>(
        &mut self,
        submitter: &Submitter<G>,
        confirmer: &dyn Confirmer,
        prompt: &str,
    ) -> ImportResult<()> {
        submitter.undo(confirmer, prompt).await?;
        self.outcome = None;
        Ok(())
    }
}
