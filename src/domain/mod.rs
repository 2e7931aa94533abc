// ==========================================
// M2O 主数据配置系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、选择状态
// 红线: 不含文件读取逻辑,不含引擎逻辑
// ==========================================

pub mod catalog;
pub mod combination;
pub mod dq;
pub mod finalized;
pub mod issue;
pub mod selection;
pub mod types;

// 重导出核心类型
pub use catalog::{
    normalize_header, BaseColor, Catalog, CatalogField, CatalogRow, PriceLookup, PriceSheet,
    PriceTable,
};
pub use combination::{CombinationKey, DisplayName, GenericCombination};
pub use dq::{DqLevel, DqReport, DqSummary, DqViolation};
pub use finalized::{FinalizedItem, ResolvedSku};
pub use issue::{IssueKind, IssueLevel, PipelineIssue, PipelineReport, ReportSummary};
pub use selection::{SelectionInvalidation, UserSelection};
pub use types::{Currency, Market, PriceKind, Region, UnknownCurrency};
