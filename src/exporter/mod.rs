// ==========================================
// M2O 主数据配置系统 - 导出层
// ==========================================
// 职责: 输出表写入 CSV,导出报告写入 JSON
// ==========================================

pub mod csv_exporter;
pub mod error;
pub mod report_exporter;

pub use csv_exporter::CsvExporter;
pub use error::{ExportError, ExportResult};
pub use report_exporter::{ExportReport, ReportExporter};
