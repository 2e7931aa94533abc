// ==========================================
// M2O 主数据配置系统 - 导入层
// ==========================================
// 职责: 目录表 / 价格表 / 输出模板导入,生成只读 Catalog
// 支持: Excel (.xlsx/.xls/.xlsm), ODS, CSV
// ==========================================

// 模块声明
pub mod catalog_loader;
pub mod data_cleaner;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;

// 重导出核心类型
pub use catalog_loader::{CatalogLoader, LoadedCatalog};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use dq_validator::DqValidator as DqValidatorImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};

// 重导出 Trait 接口
pub use importer_trait::{
    DataCleaner, DqValidator, FieldMapper, FileParser, RawCatalogRecord, RawPriceRecord, RawRow,
    RawSheet,
};
