// ==========================================
// M2O 主数据配置系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls/.xlsm) / ODS / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawRow, RawSheet};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 按表头组装一行；完全空白的行返回 None
fn build_row<I>(headers: &[String], cells: I, row_number: usize) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut values: Vec<(String, String)> = Vec::new();
    for (col_idx, value) in cells.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            // 空表头列不参与映射；同名表头以先出现者为准
            if header.is_empty() || values.iter().any(|(h, _)| h == header) {
                continue;
            }
            values.push((header.clone(), value.trim().to_string()));
        }
    }

    if values.iter().all(|(_, v)| v.is_empty()) {
        return None;
    }

    Some(RawRow { row_number, values })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_sheet(&self, file_path: &Path, _sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyTable(file_path.display().to_string()));
        }

        // 读取所有行（表头为第 1 行）
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let cells = record.iter().map(str::to_string);
            if let Some(row) = build_row(&headers, cells, row_idx + 2) {
                rows.push(row);
            }
        }

        Ok(RawSheet {
            source: file_path.display().to_string(),
            headers,
            rows,
        })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsm" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 确定工作表：指定名称（忽略大小写）或第一个工作表
        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(wanted) => sheet_names
                .iter()
                .find(|name| name.trim().eq_ignore_ascii_case(wanted.trim()))
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound {
                    path: file_path.display().to_string(),
                    sheet: wanted.to_string(),
                })?,
            None => sheet_names.first().cloned().ok_or_else(|| {
                ImportError::ExcelParseError("Excel 文件无工作表".to_string())
            })?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let source = format!("{}#{}", file_path.display(), sheet_name);

        // 工作表起始行（0 起）,用于换算原始行号
        let start_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        // 提取表头（第一行）
        let mut rows_iter = range.rows();
        let header_row = rows_iter
            .next()
            .ok_or_else(|| ImportError::EmptyTable(source.clone()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::EmptyTable(source));
        }

        // 读取数据行
        let mut rows = Vec::new();
        for (offset, data_row) in rows_iter.enumerate() {
            let cells = data_row.iter().map(|cell| cell.to_string());
            if let Some(row) = build_row(&headers, cells, start_row + offset + 2) {
                rows.push(row);
            }
        }

        Ok(RawSheet {
            source,
            headers,
            rows,
        })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_sheet(file_path, sheet),
            "xlsx" | "xls" | "xlsm" | "ods" => ExcelParser.parse_sheet(file_path, sheet),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
