// ==========================================
// M2O 主数据配置系统 - 输出组装器
// ==========================================
// 职责: 按输出模板列顺序组装导出行
// 规则: 每个模板列都出现在每一行（有值或留空）
//       通用价格列重命名为 "<列名> (<币种>)"
//       行顺序 = 定稿单品顺序
// 红线: 无法识别的模板列为配置错误,在处理前报告
//       （allow_unmapped_template_columns 开启时留空输出）
// ==========================================

use crate::config::ColumnConfig;
use crate::domain::catalog::{normalize_header, Catalog, CatalogField};
use crate::domain::finalized::FinalizedItem;
use crate::domain::types::Currency;
use crate::engine::error::{EngineError, EngineResult};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

// 模板中展示名称 / 币种列的可识别列名（标准化形式）
const DISPLAY_NAME_ALIASES: [&str; 3] = ["displayname", "productname", "name"];
const CURRENCY_ALIASES: [&str; 2] = ["currency", "currencycode"];

/// 价格列导出名: "Wholesale price" → "Wholesale price (EUR)"
pub fn price_header(name: &str, currency: Currency) -> String {
    format!("{} ({})", name.trim(), currency.label())
}

// ==========================================
// OutputField - 模板列绑定的数据来源
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputField {
    Catalog(CatalogField),
    Extra(String), // 目录原始列（标准化列名）
    DisplayName,
    Currency,
    WholesalePrice,
    RetailPrice,
    Blank, // 无法识别且允许留空
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    pub template_header: String,
    pub output_header: String,
    pub field: OutputField,
}

// ==========================================
// OutputCell / OutputTable - 导出表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputCell {
    Text(String),
    Number(f64),
    Empty,
}

impl OutputCell {
    fn text(value: Option<String>) -> Self {
        match value {
            Some(v) if !v.is_empty() => OutputCell::Text(v),
            _ => OutputCell::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, OutputCell::Empty)
    }
}

impl fmt::Display for OutputCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputCell::Text(v) => f.write_str(v),
            OutputCell::Number(v) => write!(f, "{}", v),
            OutputCell::Empty => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<OutputCell>>,
}

impl OutputTable {
    /// 按导出列名取某行单元格
    pub fn cell(&self, row: usize, header: &str) -> Option<&OutputCell> {
        let col = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// OutputAssembler - 输出组装器
// ==========================================
#[derive(Debug, Clone)]
pub struct OutputAssembler {
    currency: Currency,
    bindings: Vec<ColumnBinding>,
}

impl OutputAssembler {
    /// 绑定模板列；任何无法识别的列在此处报错
    pub fn bind(
        template_columns: &[String],
        catalog: &Catalog,
        columns: &ColumnConfig,
        currency: Currency,
    ) -> EngineResult<Self> {
        let wholesale = normalize_header(&columns.wholesale_price_column);
        let retail = normalize_header(&columns.retail_price_column);

        let mut bindings = Vec::with_capacity(template_columns.len());
        for header in template_columns {
            let normalized = normalize_header(header);

            let field = if is_price_column(header, &normalized, &wholesale) {
                OutputField::WholesalePrice
            } else if is_price_column(header, &normalized, &retail) {
                OutputField::RetailPrice
            } else if CURRENCY_ALIASES.contains(&normalized.as_str())
                && !catalog.has_source_column(header)
            {
                // 目录中没有同名的市场列时,"Currency" 指导出币种
                OutputField::Currency
            } else if let Some(field) = CatalogField::from_header(header) {
                OutputField::Catalog(field)
            } else if catalog.has_source_column(header) {
                OutputField::Extra(normalized.clone())
            } else if DISPLAY_NAME_ALIASES.contains(&normalized.as_str()) {
                OutputField::DisplayName
            } else if columns.allow_unmapped_template_columns {
                warn!(column = %header, "模板列无法识别,导出时留空");
                OutputField::Blank
            } else {
                return Err(EngineError::UnknownTemplateColumn(header.clone()));
            };

            let output_header = match field {
                OutputField::WholesalePrice => {
                    price_header(&columns.wholesale_price_column, currency)
                }
                OutputField::RetailPrice => price_header(&columns.retail_price_column, currency),
                _ => header.clone(),
            };

            bindings.push(ColumnBinding {
                template_header: header.clone(),
                output_header,
                field,
            });
        }

        debug!(columns = bindings.len(), currency = %currency, "模板列绑定完成");
        Ok(Self { currency, bindings })
    }

    pub fn bindings(&self) -> &[ColumnBinding] {
        &self.bindings
    }

    pub fn headers(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.output_header.clone()).collect()
    }

    /// 组装导出表（行顺序与输入一致）
    pub fn assemble(&self, items: &[FinalizedItem]) -> OutputTable {
        let rows = items
            .iter()
            .map(|item| {
                self.bindings
                    .iter()
                    .map(|binding| self.cell(item, &binding.field))
                    .collect()
            })
            .collect();

        OutputTable {
            headers: self.headers(),
            rows,
        }
    }

    fn cell(&self, item: &FinalizedItem, field: &OutputField) -> OutputCell {
        match field {
            OutputField::Catalog(field) => OutputCell::text(field.value_of(&item.row)),
            OutputField::Extra(header) => {
                OutputCell::text(item.row.extra.get(header).cloned())
            }
            OutputField::DisplayName => {
                OutputCell::text(Some(item.display_name.as_str().to_string()))
            }
            OutputField::Currency => OutputCell::Text(self.currency.label().to_string()),
            OutputField::WholesalePrice => item
                .wholesale_price
                .map(OutputCell::Number)
                .unwrap_or(OutputCell::Empty),
            OutputField::RetailPrice => item
                .retail_price
                .map(OutputCell::Number)
                .unwrap_or(OutputCell::Empty),
            OutputField::Blank => OutputCell::Empty,
        }
    }
}

/// 通用价格列,或已带币种后缀的价格列（如 "Wholesale price (DKK)"）
fn is_price_column(header: &str, normalized: &str, price_column: &str) -> bool {
    if price_column.is_empty() {
        return false;
    }
    if normalized == price_column {
        return true;
    }
    match header.trim().rsplit_once('(') {
        Some((base, suffix)) if suffix.trim_end().ends_with(')') => {
            let label = suffix.trim_end().trim_end_matches(')');
            normalize_header(base) == price_column && label.parse::<Currency>().is_ok()
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{BaseColor, CatalogRow, PriceSheet, PriceTable};
    use crate::domain::combination::DisplayName;
    use crate::domain::types::{Market, PriceKind, Region};
    use std::collections::{BTreeMap, BTreeSet};

    fn price_table(region: Region) -> PriceTable {
        PriceTable {
            region,
            wholesale: PriceSheet::new(PriceKind::Wholesale, BTreeSet::new()),
            retail: PriceSheet::new(PriceKind::Retail, BTreeSet::new()),
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            rows: vec![],
            eu_prices: price_table(Region::Eu),
            uk_prices: price_table(Region::UkIe),
            source_columns: vec!["Item No".to_string(), "EAN".to_string()],
        }
    }

    fn item(item_no: &str, wholesale: Option<f64>) -> FinalizedItem {
        let mut extra = BTreeMap::new();
        extra.insert("ean".to_string(), format!("57{}", item_no));
        let row = CatalogRow {
            item_no: item_no.to_string(),
            article_no: Some("A100".to_string()),
            product_family: "Outline".to_string(),
            product_type: "Sofa".to_string(),
            product_model: "3-seater".to_string(),
            sofa_direction: None,
            upholstery_type: "Fiord".to_string(),
            color: "151".to_string(),
            base_color: BaseColor::new("Black"),
            market: Market::Eu,
            image_url: None,
            extra,
            row_number: 2,
        };
        FinalizedItem {
            combination: row.combination_key(),
            display_name: DisplayName::build("Sofa", "3-seater", None),
            row,
            wholesale_price: wholesale,
            retail_price: Some(299.0),
        }
    }

    fn template(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_price_headers_renamed_with_currency() {
        let assembler = OutputAssembler::bind(
            &template(&["Item No", "Wholesale price", "Retail price"]),
            &catalog(),
            &ColumnConfig::default(),
            Currency::IeEur,
        )
        .unwrap();

        assert_eq!(
            assembler.headers(),
            vec!["Item No", "Wholesale price (IE - EUR)", "Retail price (IE - EUR)"]
        );
    }

    #[test]
    fn test_every_template_column_present_in_every_row() {
        let assembler = OutputAssembler::bind(
            &template(&["Item No", "Image URL", "EAN", "Wholesale price", "Currency"]),
            &catalog(),
            &ColumnConfig::default(),
            Currency::Eur,
        )
        .unwrap();

        let table = assembler.assemble(&[item("1001", Some(100.5)), item("1002", None)]);

        assert_eq!(table.len(), 2);
        assert!(table.rows.iter().all(|r| r.len() == table.headers.len()));
        assert_eq!(table.cell(0, "Image URL"), Some(&OutputCell::Empty));
        assert_eq!(table.cell(0, "EAN"), Some(&OutputCell::Text("571001".to_string())));
        assert_eq!(
            table.cell(0, "Wholesale price (EUR)"),
            Some(&OutputCell::Number(100.5))
        );
        assert_eq!(table.cell(1, "Wholesale price (EUR)"), Some(&OutputCell::Empty));
        assert_eq!(table.cell(1, "Currency"), Some(&OutputCell::Text("EUR".to_string())));
    }

    #[test]
    fn test_unknown_template_column_is_config_error() {
        let result = OutputAssembler::bind(
            &template(&["Item No", "Warehouse"]),
            &catalog(),
            &ColumnConfig::default(),
            Currency::Eur,
        );
        assert_eq!(
            result.unwrap_err(),
            EngineError::UnknownTemplateColumn("Warehouse".to_string())
        );
    }

    #[test]
    fn test_unknown_template_column_tolerated_when_allowed() {
        let columns = ColumnConfig {
            allow_unmapped_template_columns: true,
            ..ColumnConfig::default()
        };
        let assembler = OutputAssembler::bind(
            &template(&["Warehouse", "Item No"]),
            &catalog(),
            &columns,
            Currency::Eur,
        )
        .unwrap();

        let table = assembler.assemble(&[item("1001", None)]);
        assert_eq!(table.rows[0][0], OutputCell::Empty);
        assert_eq!(table.rows[0][1], OutputCell::Text("1001".to_string()));
    }

    #[test]
    fn test_currency_suffixed_price_column_rebinds() {
        let assembler = OutputAssembler::bind(
            &template(&["Wholesale price (DKK)"]),
            &catalog(),
            &ColumnConfig::default(),
            Currency::Sek,
        )
        .unwrap();

        assert_eq!(assembler.bindings()[0].field, OutputField::WholesalePrice);
        assert_eq!(assembler.headers(), vec!["Wholesale price (SEK)"]);
    }

    #[test]
    fn test_currency_column_follows_catalog_source() {
        let bind = |catalog: &Catalog| {
            OutputAssembler::bind(
                &template(&["Currency"]),
                catalog,
                &ColumnConfig::default(),
                Currency::Gbp,
            )
            .unwrap()
        };

        let exported = bind(&catalog());
        assert_eq!(exported.bindings()[0].field, OutputField::Currency);
        let table = exported.assemble(&[item("1001", None)]);
        assert_eq!(table.rows[0][0], OutputCell::Text("GBP".to_string()));

        // 目录以 "Currency" 作为市场列时透传市场标记
        let mut with_market = catalog();
        with_market.source_columns.push("Currency".to_string());
        let passthrough = bind(&with_market);
        assert_eq!(
            passthrough.bindings()[0].field,
            OutputField::Catalog(CatalogField::Market)
        );
        let table = passthrough.assemble(&[item("1001", None)]);
        assert_eq!(table.rows[0][0], OutputCell::Text("EU".to_string()));
    }
}
