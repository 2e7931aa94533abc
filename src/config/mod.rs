// ==========================================
// M2O 主数据配置系统 - 配置层
// ==========================================
// 职责: 数据源路径、列名与导出配置管理
// 存储: JSON 配置文件
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置类型
pub use app_config::{AppConfig, ColumnConfig, OutputConfig, PriceTableSource, SheetSource, SourceConfig};
pub use config_manager::{price_column_for, ConfigError, ConfigManager, ConfigResult, CONFIG_PATH_ENV};
