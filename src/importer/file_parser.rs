// ==========================================
// 护理实习管理系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx) / CSV (.csv)
// 规则: 首个工作表，首行为表头；表头统一小写 + 去空白
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::roster_importer_trait::{FileParser, RawRow};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 表头规范化：去空白 + 小写
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// 检查文件存在且扩展名在允许列表内
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

/// 将一行单元格按表头组装为 RawRow；空白行返回 None
fn assemble_row<I>(headers: &[String], values: I, row_number: usize) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut cells = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        match headers.get(col_idx) {
            // 无表头的列直接忽略
            Some(header) if !header.is_empty() => {
                cells.insert(header.clone(), value.trim().to_string());
            }
            _ => {}
        }
    }

    if cells.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRow { row_number, cells })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            // 表头占第 1 行
            let row_number = idx + 2;
            if let Some(row) =
                assemble_row(&headers, record.iter().map(str::to_string), row_number)
            {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["xlsx"])?;

        let mut workbook: Xlsx<_> = open_workbook(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件缺少表头行".to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        let mut records = Vec::new();
        for (idx, data_row) in rows.enumerate() {
            let row_number = idx + 2;
            if let Some(row) = assemble_row(
                &headers,
                data_row.iter().map(|cell| cell.to_string()),
                row_number,
            ) {
                records.push(row);
            }
        }

        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(file_path),
            "xlsx" => ExcelParser.parse_to_raw_records(file_path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_normalizes_headers() {
        let temp_file = csv_file(&[
            " Email ,FirstName,ROLE,StudentId",
            "a@nu.ac.th,Anan,student,64000001",
        ]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 1);
        let cells = &records[0].cells;
        assert_eq!(cells.get("email"), Some(&"a@nu.ac.th".to_string()));
        assert_eq!(cells.get("firstname"), Some(&"Anan".to_string()));
        assert_eq!(cells.get("role"), Some(&"student".to_string()));
        assert_eq!(cells.get("studentid"), Some(&"64000001".to_string()));
        assert_eq!(records[0].row_number, 2);
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_keeps_row_numbers() {
        let temp_file = csv_file(&["email,name", "a@nu.ac.th,A", ",", "b@nu.ac.th,B"]);

        let records = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].row_number, 2);
        assert_eq!(records[1].row_number, 4);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let temp_file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser.parse_to_raw_records(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"));
    }

    #[test]
    fn test_excel_parser_rejects_corrupt_file() {
        let mut temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(temp_file, "not a zip archive").unwrap();

        let result = ExcelParser.parse_to_raw_records(temp_file.path());
        assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
    }
}
