// ==========================================
// M2O 主数据配置系统 - 应用配置结构
// ==========================================
// 存储: JSON 配置文件（字段均有默认值,可部分覆写）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ==========================================
// SheetSource - 单个表格数据源
// ==========================================
// Excel/ODS 按工作表名读取（缺省取第一个工作表）,CSV 忽略工作表名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSource {
    pub path: PathBuf,
    #[serde(default)]
    pub sheet: Option<String>,
}

impl SheetSource {
    pub fn new<P: Into<PathBuf>>(path: P, sheet: Option<&str>) -> Self {
        Self {
            path: path.into(),
            sheet: sheet.map(str::to_string),
        }
    }

    /// 相对路径按配置文件所在目录解析
    pub fn resolve_against(&mut self, base_dir: &Path) {
        if self.path.is_relative() {
            self.path = base_dir.join(&self.path);
        }
    }
}

// ==========================================
// PriceTableSource - 区域价格表（批发 + 零售工作表）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTableSource {
    pub wholesale: SheetSource,
    pub retail: SheetSource,
}

impl PriceTableSource {
    fn workbook(path: &str) -> Self {
        Self {
            wholesale: SheetSource::new(path, Some("Wholesale")),
            retail: SheetSource::new(path, Some("Retail")),
        }
    }
}

// ==========================================
// SourceConfig - 输入数据源
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_catalog_source")]
    pub catalog: SheetSource,
    #[serde(default = "default_eu_prices")]
    pub eu_prices: PriceTableSource,
    #[serde(default = "default_uk_prices")]
    pub uk_prices: PriceTableSource,
    #[serde(default = "default_template_source")]
    pub template: SheetSource,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_source(),
            eu_prices: default_eu_prices(),
            uk_prices: default_uk_prices(),
            template: default_template_source(),
        }
    }
}

fn default_catalog_source() -> SheetSource {
    SheetSource::new("raw-data.xlsx", None)
}

fn default_eu_prices() -> PriceTableSource {
    PriceTableSource::workbook("prices-eu.xlsx")
}

fn default_uk_prices() -> PriceTableSource {
    PriceTableSource::workbook("prices-uk-ie.xlsx")
}

fn default_template_source() -> SheetSource {
    SheetSource::new("Masterdata-output-template.xlsx", None)
}

// ==========================================
// ColumnConfig - 输出列配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    /// 模板中通用批发价列名（导出时追加币种）
    #[serde(default = "default_wholesale_column")]
    pub wholesale_price_column: String,

    /// 模板中通用零售价列名（导出时追加币种）
    #[serde(default = "default_retail_column")]
    pub retail_price_column: String,

    /// 价格表中币种列名覆写（币种标签 → 列名）
    ///
    /// 缺省时价格表列名即币种标签,例如 "EUR" / "IE - EUR"
    #[serde(default)]
    pub price_column_overrides: BTreeMap<String, String>,

    /// 模板中无法识别的列是否允许留空导出（默认视为配置错误）
    #[serde(default)]
    pub allow_unmapped_template_columns: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            wholesale_price_column: default_wholesale_column(),
            retail_price_column: default_retail_column(),
            price_column_overrides: BTreeMap::new(),
            allow_unmapped_template_columns: false,
        }
    }
}

fn default_wholesale_column() -> String {
    "Wholesale price".to_string()
}

fn default_retail_column() -> String {
    "Retail price".to_string()
}

// ==========================================
// OutputConfig - 导出配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// 导出报告（JSON）路径,缺省不写报告
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            report_path: None,
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("masterdata-export.csv")
}

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourceConfig,

    /// 缺省币种（选择文件未指定币种时使用）
    #[serde(default)]
    pub default_currency: Option<String>,

    #[serde(default)]
    pub columns: ColumnConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// 将所有相对路径按 base_dir 解析
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        self.sources.catalog.resolve_against(base_dir);
        self.sources.eu_prices.wholesale.resolve_against(base_dir);
        self.sources.eu_prices.retail.resolve_against(base_dir);
        self.sources.uk_prices.wholesale.resolve_against(base_dir);
        self.sources.uk_prices.retail.resolve_against(base_dir);
        self.sources.template.resolve_against(base_dir);

        if self.output.path.is_relative() {
            self.output.path = base_dir.join(&self.output.path);
        }
        if let Some(report) = self.output.report_path.as_mut() {
            if report.is_relative() {
                *report = base_dir.join(&*report);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "default_currency": "DKK" }"#).unwrap();

        assert_eq!(config.default_currency.as_deref(), Some("DKK"));
        assert_eq!(config.sources.catalog.path, PathBuf::from("raw-data.xlsx"));
        assert_eq!(config.sources.eu_prices.retail.sheet.as_deref(), Some("Retail"));
        assert_eq!(config.columns.wholesale_price_column, "Wholesale price");
        assert!(!config.columns.allow_unmapped_template_columns);
    }

    #[test]
    fn test_resolve_paths_keeps_absolute() {
        let mut config = AppConfig::default();
        config.sources.template = SheetSource::new("/data/template.csv", None);
        config.resolve_paths(Path::new("/etc/m2o"));

        assert_eq!(config.sources.catalog.path, PathBuf::from("/etc/m2o/raw-data.xlsx"));
        assert_eq!(config.sources.template.path, PathBuf::from("/data/template.csv"));
        assert_eq!(
            config.output.path,
            PathBuf::from("/etc/m2o/masterdata-export.csv")
        );
    }
}
