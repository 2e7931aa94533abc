// ==========================================
// M2O 主数据配置系统 - 导出报告写入器
// ==========================================
// 职责: 将导出元信息 + 逐单品问题 + 导入 DQ 报告写为 JSON
// ==========================================

use crate::domain::dq::DqReport;
use crate::domain::issue::PipelineReport;
use crate::domain::types::Currency;
use crate::engine::orchestrator::ExportOutcome;
use crate::exporter::error::{ExportError, ExportResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ExportReport<'a> {
    pub export_id: &'a str,
    pub generated_at: DateTime<Utc>,
    pub currency: Currency,
    pub output_rows: usize,
    pub pipeline: &'a PipelineReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<&'a DqReport>,
}

impl<'a> ExportReport<'a> {
    pub fn new(outcome: &'a ExportOutcome, data_quality: Option<&'a DqReport>) -> Self {
        Self {
            export_id: &outcome.export_id,
            generated_at: outcome.generated_at,
            currency: outcome.currency,
            output_rows: outcome.table.len(),
            pipeline: &outcome.report,
            data_quality,
        }
    }
}

pub struct ReportExporter;

impl ReportExporter {
    pub fn to_json(report: &ExportReport<'_>) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    pub fn write_file(report: &ExportReport<'_>, path: &Path) -> ExportResult<()> {
        let json = Self::to_json(report)?;
        let write_error = |e: std::io::Error| ExportError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, json).map_err(write_error)?;

        info!(path = %path.display(), export_id = %report.export_id, "导出报告已写入");
        Ok(())
    }
}
