// ==========================================
// M2O 主数据配置系统 - 导出编排器
// ==========================================
// 用途: 协调各引擎的执行顺序
// 流程: 配置校验 → 市场过滤 → 组合分组 → SKU 定稿 → 查价 → 输出组装
// 红线: 配置错误在任何处理之前返回；逐单品问题累积到报告
// ==========================================

use crate::config::ColumnConfig;
use crate::domain::catalog::Catalog;
use crate::domain::finalized::FinalizedItem;
use crate::domain::issue::{PipelineReport, ReportSummary};
use crate::domain::selection::UserSelection;
use crate::domain::types::Currency;
use crate::engine::combination_grouper::CombinationGrouper;
use crate::engine::error::EngineResult;
use crate::engine::market_filter::MarketFilter;
use crate::engine::output_assembler::{OutputAssembler, OutputTable};
use crate::engine::price_resolver::PriceResolver;
use crate::engine::sku_finalizer::SkuFinalizer;
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FinalizedPreview - 定稿预览（不组装输出表）
// ==========================================
#[derive(Debug, Clone)]
pub struct FinalizedPreview {
    pub currency: Currency,
    pub items: Vec<FinalizedItem>,
    pub report: PipelineReport,
}

// ==========================================
// ExportOutcome - 导出结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub export_id: String,
    pub generated_at: DateTime<Utc>,
    pub currency: Currency,
    pub table: OutputTable,
    pub items: Vec<FinalizedItem>,
    pub report: PipelineReport,
}

// ==========================================
// ExportOrchestrator - 导出编排器
// ==========================================
pub struct ExportOrchestrator<'a> {
    catalog: &'a Catalog,
    template_columns: &'a [String],
    columns: &'a ColumnConfig,
}

impl<'a> ExportOrchestrator<'a> {
    /// 创建编排器
    ///
    /// # 参数
    /// - catalog: 会话级只读目录
    /// - template_columns: 输出模板列
    /// - columns: 输出列配置
    pub fn new(
        catalog: &'a Catalog,
        template_columns: &'a [String],
        columns: &'a ColumnConfig,
    ) -> Self {
        Self {
            catalog,
            template_columns,
            columns,
        }
    }

    /// 定稿 + 查价（不校验模板）
    #[instrument(skip_all, fields(currency = %selection.currency()))]
    pub fn preview(&self, selection: &UserSelection) -> EngineResult<FinalizedPreview> {
        self.run(selection)
    }

    /// 执行完整导出流程
    ///
    /// # 返回
    /// - Ok(ExportOutcome): 导出表 + 报告（可能包含逐单品问题）
    /// - Err(EngineError): 配置错误,未做任何处理
    #[instrument(skip_all, fields(currency = %selection.currency()))]
    pub fn export(&self, selection: &UserSelection) -> EngineResult<ExportOutcome> {
        let currency = selection.currency();
        let export_id = Uuid::new_v4().to_string();
        info!(export_id = %export_id, selected = selection.selected_count(), "开始导出");

        // ==========================================
        // 步骤0: 配置校验（价格列 + 模板列）
        // ==========================================
        let table = self.catalog.price_table(currency.region());
        PriceResolver::ensure_columns(table, currency)?;
        let assembler =
            OutputAssembler::bind(self.template_columns, self.catalog, self.columns, currency)?;

        let preview = self.run(selection)?;

        // ==========================================
        // 步骤5: 输出组装
        // ==========================================
        debug!("步骤5: 组装输出表");
        let output = assembler.assemble(&preview.items);

        if preview.report.has_errors() {
            warn!(
                incomplete = preview.report.summary.incomplete_selections,
                integrity_errors = preview.report.summary.integrity_errors,
                "导出存在未输出的选择"
            );
        }
        info!(
            export_id = %export_id,
            rows = output.len(),
            price_warnings = preview.report.summary.price_warnings,
            "导出完成"
        );

        Ok(ExportOutcome {
            export_id,
            generated_at: Utc::now(),
            currency,
            table: output,
            items: preview.items,
            report: preview.report,
        })
    }

    fn run(&self, selection: &UserSelection) -> EngineResult<FinalizedPreview> {
        let currency = selection.currency();

        // ==========================================
        // 步骤1-2: 市场过滤 + 组合分组
        // ==========================================
        debug!("步骤1: 市场过滤与组合分组");
        let visible = MarketFilter::filter(&self.catalog.rows, currency);
        let index = CombinationGrouper::group(&visible, currency);

        // ==========================================
        // 步骤3: SKU 定稿
        // ==========================================
        debug!("步骤3: SKU 定稿");
        let finalized = SkuFinalizer::finalize(&visible, &index, selection)?;

        // ==========================================
        // 步骤4: 查价
        // ==========================================
        debug!("步骤4: 查价");
        let table = self.catalog.price_table(currency.region());
        let priced = PriceResolver::resolve(finalized.skus, table, currency)?;

        let mut issues = finalized.issues;
        issues.extend(priced.issues);

        let mut report = PipelineReport {
            summary: ReportSummary {
                selected_combinations: selection.selected_count(),
                exported_items: priced.items.len(),
                removed_items: finalized.removed_count,
                ..ReportSummary::default()
            },
            issues,
        };
        report.refresh_issue_counts();

        Ok(FinalizedPreview {
            currency,
            items: priced.items,
            report,
        })
    }
}
