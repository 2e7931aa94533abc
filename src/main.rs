// ==========================================
// M2O 主数据配置系统 - 批量导出入口
// ==========================================
// 用法:
//   m2o-masterdata <selection.json>
//   m2o-masterdata <config.json> <selection.json> [output.csv]
//
// 流程: 日志 → 配置 → 目录加载 → 重放选择 → 导出 CSV + 报告
// ==========================================

use anyhow::{bail, Context};
use m2o_masterdata::config::ConfigManager;
use m2o_masterdata::domain::Currency;
use m2o_masterdata::exporter::{CsvExporter, ExportReport, ReportExporter};
use m2o_masterdata::{logging, CatalogLoader, ConfiguratorSession, SelectionFile};
use std::path::PathBuf;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, selection_path, output_path) = match args.as_slice() {
        [selection] => (None, PathBuf::from(selection), None),
        [config, selection] => (Some(PathBuf::from(config)), PathBuf::from(selection), None),
        [config, selection, output] => (
            Some(PathBuf::from(config)),
            PathBuf::from(selection),
            Some(PathBuf::from(output)),
        ),
        _ => bail!("用法: m2o-masterdata [config.json] <selection.json> [output.csv]"),
    };

    info!("==================================================");
    info!("{} v{}", m2o_masterdata::APP_NAME, m2o_masterdata::VERSION);
    info!("==================================================");

    // === 配置 ===
    let manager = match config_path {
        Some(path) => ConfigManager::load_from_path(&path)?,
        None => ConfigManager::load_default()?,
    };
    let config = manager.config().clone();

    // === 选择文件 ===
    let selection = SelectionFile::load(&selection_path)?;
    let currency: Currency = match (selection.currency()?, manager.default_currency()) {
        (Some(currency), _) | (None, Some(currency)) => currency,
        (None, None) => bail!("选择文件与配置均未指定币种"),
    };

    // === 目录加载（全有或全无）===
    let loaded = CatalogLoader::with_defaults()
        .load(&config)
        .context("目录加载失败,未执行导出")?;

    // === 重放选择 + 导出 ===
    let mut session = ConfiguratorSession::new(loaded, config.columns.clone(), currency);
    selection.apply(&mut session)?;
    let outcome = session.export()?;

    let output = output_path.unwrap_or_else(|| config.output.path.clone());
    CsvExporter::write_file(&outcome.table, &output)?;

    if let Some(report_path) = config.output.report_path.as_deref() {
        let report = ExportReport::new(&outcome, Some(session.dq_report()));
        ReportExporter::write_file(&report, report_path)?;
    }

    if outcome.report.has_errors() {
        warn!(
            incomplete = outcome.report.summary.incomplete_selections,
            integrity_errors = outcome.report.summary.integrity_errors,
            "部分选择未导出,详见报告"
        );
    }

    info!(
        export_id = %outcome.export_id,
        output = %output.display(),
        rows = outcome.table.len(),
        "批量导出完成"
    );
    Ok(())
}
