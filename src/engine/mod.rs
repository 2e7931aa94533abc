// ==========================================
// M2O 主数据配置系统 - 引擎层
// ==========================================
// 职责: 配置到 SKU 的解析与定价规则
// 红线: 引擎不读写文件,每个阶段是输入 + 用户选择的纯函数
// ==========================================

pub mod base_color_resolver;
pub mod combination_grouper;
pub mod error;
pub mod invalidation;
pub mod market_filter;
pub mod orchestrator;
pub mod output_assembler;
pub mod price_resolver;
pub mod sku_finalizer;

// 重导出核心引擎
pub use base_color_resolver::{BaseColorResolution, BaseColorResolver};
pub use combination_grouper::{CombinationGrouper, CombinationIndex};
pub use error::{EngineError, EngineResult};
pub use invalidation::SelectionInvalidator;
pub use market_filter::{parse_currency, MarketFilter};
pub use orchestrator::{ExportOrchestrator, ExportOutcome, FinalizedPreview};
pub use output_assembler::{
    price_header, ColumnBinding, OutputAssembler, OutputCell, OutputField, OutputTable,
};
pub use price_resolver::{PriceResolver, PricingResult};
pub use sku_finalizer::{FinalizationResult, SkuFinalizer};
