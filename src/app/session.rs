// ==========================================
// M2O 主数据配置系统 - 配置会话
// ==========================================
// 职责: 持有只读目录、当前组合索引与用户选择,对外提供选择操作
// 红线: 会话由调用方持有,不使用全局状态
// 红线: 派生状态（组合索引）随币种切换立即重算
// ==========================================

use crate::config::ColumnConfig;
use crate::domain::catalog::{BaseColor, Catalog};
use crate::domain::combination::{CombinationKey, GenericCombination};
use crate::domain::dq::DqReport;
use crate::domain::selection::{SelectionInvalidation, UserSelection};
use crate::domain::types::Currency;
use crate::engine::{
    parse_currency, BaseColorResolution, BaseColorResolver, CombinationGrouper, CombinationIndex,
    EngineError, EngineResult, ExportOrchestrator, ExportOutcome, FinalizedPreview, MarketFilter,
    SelectionInvalidator,
};
use crate::importer::LoadedCatalog;
use tracing::{debug, info};

pub struct ConfiguratorSession {
    catalog: Catalog,
    template_columns: Vec<String>,
    dq_report: DqReport,
    columns: ColumnConfig,
    index: CombinationIndex,
    selection: UserSelection,
}

impl ConfiguratorSession {
    /// 创建会话（目录加载成功后）
    pub fn new(loaded: LoadedCatalog, columns: ColumnConfig, currency: Currency) -> Self {
        let LoadedCatalog {
            catalog,
            template_columns,
            dq_report,
        } = loaded;
        let index = build_index(&catalog, currency);
        info!(
            currency = %currency,
            combinations = index.len(),
            "配置会话已创建"
        );

        Self {
            catalog,
            template_columns,
            dq_report,
            columns,
            index,
            selection: UserSelection::new(currency),
        }
    }

    // ===== 只读访问 =====

    pub fn currency(&self) -> Currency {
        self.selection.currency()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn template_columns(&self) -> &[String] {
        &self.template_columns
    }

    pub fn dq_report(&self) -> &DqReport {
        &self.dq_report
    }

    pub fn index(&self) -> &CombinationIndex {
        &self.index
    }

    pub fn combinations(&self) -> &[GenericCombination] {
        self.index.combinations()
    }

    pub fn selection(&self) -> &UserSelection {
        &self.selection
    }

    /// 组合当前的有效底座颜色
    pub fn resolution(&self, key: &CombinationKey) -> EngineResult<BaseColorResolution> {
        let combination = self.combination(key)?;
        Ok(BaseColorResolver::effective_resolution(&self.selection, combination))
    }

    // ===== 币种 =====

    /// 切换币种：重算组合索引并丢弃失效的选择
    pub fn change_currency(&mut self, currency: Currency) -> SelectionInvalidation {
        let visible = MarketFilter::filter(&self.catalog.rows, currency);
        let index = CombinationGrouper::group(&visible, currency);
        let invalidation = SelectionInvalidator::apply(&mut self.selection, &index, &visible);
        self.index = index;
        invalidation
    }

    /// 按币种标签切换；未识别币种为配置错误,状态不变
    pub fn change_currency_label(&mut self, label: &str) -> EngineResult<SelectionInvalidation> {
        let currency = parse_currency(label)?;
        Ok(self.change_currency(currency))
    }

    // ===== 组合选择 =====

    /// 选中组合；返回是否为新增
    pub fn select(&mut self, key: &CombinationKey) -> EngineResult<bool> {
        self.combination(key)?;
        let added = self.selection.select_combination(key.clone());
        debug!(combination = %key, added, "选中组合");
        Ok(added)
    }

    pub fn deselect(&mut self, key: &CombinationKey) -> bool {
        self.selection.deselect_combination(key)
    }

    // ===== 底座颜色 =====

    pub fn set_family_base_colors(
        &mut self,
        family: &str,
        colors: &[BaseColor],
    ) -> EngineResult<()> {
        BaseColorResolver::set_family_base_colors(&mut self.selection, &self.index, family, colors)
    }

    pub fn set_combination_base_colors(
        &mut self,
        key: &CombinationKey,
        colors: &[BaseColor],
    ) -> EngineResult<()> {
        BaseColorResolver::set_combination_base_colors(
            &mut self.selection,
            &self.index,
            key,
            colors,
        )
    }

    pub fn clear_combination_override(&mut self, key: &CombinationKey) -> bool {
        self.selection.clear_combination_override(key)
    }

    // ===== 单品移除 =====

    pub fn remove_item(&mut self, item_no: &str) -> bool {
        self.selection.remove_item(item_no)
    }

    pub fn restore_item(&mut self, item_no: &str) -> bool {
        self.selection.restore_item(item_no)
    }

    // ===== 定稿 / 导出 =====

    /// 定稿预览（每次由选择 + 目录 + 价格表重新生成）
    pub fn finalize_preview(&self) -> EngineResult<FinalizedPreview> {
        self.orchestrator().preview(&self.selection)
    }

    pub fn export(&self) -> EngineResult<ExportOutcome> {
        self.orchestrator().export(&self.selection)
    }

    fn orchestrator(&self) -> ExportOrchestrator<'_> {
        ExportOrchestrator::new(&self.catalog, &self.template_columns, &self.columns)
    }

    fn combination(&self, key: &CombinationKey) -> EngineResult<&GenericCombination> {
        self.index
            .get(key)
            .ok_or_else(|| EngineError::UnknownCombination(key.clone()))
    }
}

fn build_index(catalog: &Catalog, currency: Currency) -> CombinationIndex {
    let visible = MarketFilter::filter(&catalog.rows, currency);
    CombinationGrouper::group(&visible, currency)
}
