// ==========================================
// 护理实习管理系统 - 导入预览（只读投影）
// ==========================================
// 输入: 批次 + 过滤条件 + 搜索词 + 页码
// 顺序: 合法性过滤 → 关键字搜索 → 分页
// 红线: 每次投影都重新执行校验，不在行上缓存结果
// ==========================================

use crate::domain::{RowRecord, ValidityFilter};
use crate::importer::roster_importer_trait::RowValidator;
use crate::importer::row_validator::RowViolation;

/// 默认每页行数
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ==========================================
// PreviewQuery - 预览查询条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewQuery {
    pub filter: ValidityFilter,
    pub search: String,
    pub page: usize,      // 从 1 开始
    pub page_size: usize, // 至少为 1
}

impl Default for PreviewQuery {
    fn default() -> Self {
        Self {
            filter: ValidityFilter::All,
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PreviewQuery {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Default::default()
        }
    }
}

// ==========================================
// PreviewRow / PreviewPage - 投影结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewRow<'a> {
    pub index: usize, // 在批次中的位置（0 起）
    pub row: &'a RowRecord,
    pub violations: Vec<RowViolation>,
}

impl PreviewRow<'_> {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewPage<'a> {
    pub rows: Vec<PreviewRow<'a>>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub matched: usize,       // 过滤 + 搜索后的行数
    pub total: usize,         // 批次总行数
    pub valid_count: usize,   // 批次内合法行数
    pub invalid_count: usize, // 批次内非法行数
}

/// 搜索用的展示字段：姓名、邮箱、学号
fn row_matches_search(row: &RowRecord, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }

    let haystacks = [
        row.display_name(),
        row.email.clone().unwrap_or_default(),
        row.student_id.clone().unwrap_or_default(),
    ];
    haystacks
        .iter()
        .any(|h| h.to_lowercase().contains(needle_lower))
}

/// 过滤 + 搜索（不分页）
pub fn filter_rows<'a>(
    rows: &'a [RowRecord],
    validator: &dyn RowValidator,
    filter: ValidityFilter,
    search: &str,
) -> Vec<PreviewRow<'a>> {
    let needle = search.trim().to_lowercase();

    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let violations = validator.violations(row);
            if !filter.accepts(violations.is_empty()) {
                return None;
            }
            if !row_matches_search(row, &needle) {
                return None;
            }
            Some(PreviewRow {
                index,
                row,
                violations,
            })
        })
        .collect()
}

/// 生成一页预览；超出范围的页码收敛到最后一页
pub fn project<'a>(
    rows: &'a [RowRecord],
    validator: &dyn RowValidator,
    query: &PreviewQuery,
) -> PreviewPage<'a> {
    let page_size = query.page_size.max(1);
    let valid_count = rows.iter().filter(|r| validator.is_valid(r)).count();

    let matched_rows = filter_rows(rows, validator, query.filter, &query.search);
    let matched = matched_rows.len();
    let total_pages = matched.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let page_rows = matched_rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    PreviewPage {
        rows: page_rows,
        page,
        page_size,
        total_pages,
        matched,
        total: rows.len(),
        valid_count,
        invalid_count: rows.len() - valid_count,
    }
}
