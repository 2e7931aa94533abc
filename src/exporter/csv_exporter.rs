// ==========================================
// M2O 主数据配置系统 - CSV 导出器
// ==========================================
// 职责: 将输出表按模板列顺序写入 CSV
// ==========================================

use crate::engine::output_assembler::OutputTable;
use crate::exporter::error::{ExportError, ExportResult};
use csv::Writer;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

pub struct CsvExporter;

impl CsvExporter {
    /// 写入输出表到任意 Writer（表头 + 数据行）
    pub fn write_to<W: Write>(table: &OutputTable, writer: W) -> ExportResult<()> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(&table.headers)?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// 写入输出表到文件（自动创建父目录）
    pub fn write_file(table: &OutputTable, path: &Path) -> ExportResult<()> {
        let write_error = |e: std::io::Error| ExportError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let file = File::create(path).map_err(write_error)?;
        Self::write_to(table, file)?;

        info!(path = %path.display(), rows = table.len(), "CSV 导出完成");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::output_assembler::OutputCell;

    #[test]
    fn test_write_to_keeps_blank_cells() {
        let table = OutputTable {
            headers: vec!["Item No".to_string(), "Wholesale price (EUR)".to_string()],
            rows: vec![
                vec![OutputCell::Text("1001".to_string()), OutputCell::Number(199.95)],
                vec![OutputCell::Text("1002".to_string()), OutputCell::Empty],
            ],
        };

        let mut buffer = Vec::new();
        CsvExporter::write_to(&table, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Item No,Wholesale price (EUR)\n1001,199.95\n1002,\n"
        );
    }

    #[test]
    fn test_write_file_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("export.csv");
        let table = OutputTable {
            headers: vec!["Item No".to_string()],
            rows: vec![],
        };

        CsvExporter::write_file(&table, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Item No\n");
    }
}
