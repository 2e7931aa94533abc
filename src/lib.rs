// ==========================================
// M2O 主数据配置系统 - 核心库
// ==========================================
// 系统定位: 配置到 SKU 解析与定价引擎
// 流程: 目录加载 → 市场过滤 → 组合分组 → 底座颜色解析 → SKU 定稿 → 查价 → 输出组装
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 目录 / 价格表 / 模板
pub mod importer;

// 引擎层 - 解析与定价规则
pub mod engine;

// 导出层 - CSV / 报告
pub mod exporter;

// 配置层 - 应用配置
pub mod config;

// 应用层 - 配置会话
pub mod app;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Currency, Market, PriceKind, Region};

// 领域实体
pub use domain::{
    BaseColor, Catalog, CatalogRow, CombinationKey, DisplayName, FinalizedItem,
    GenericCombination, PipelineIssue, PipelineReport, UserSelection,
};

// 引擎
pub use engine::{
    BaseColorResolver, CombinationGrouper, EngineError, ExportOrchestrator, ExportOutcome,
    MarketFilter, OutputAssembler, PriceResolver, SkuFinalizer,
};

// 应用
pub use app::{ConfiguratorSession, SelectionFile};
pub use config::{AppConfig, ConfigManager};
pub use importer::{CatalogLoader, LoadedCatalog};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "M2O 主数据配置系统";
