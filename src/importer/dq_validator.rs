// ==========================================
// M2O 主数据配置系统 - 数据质量校验器实现
// ==========================================
// 职责: 目录行 / 价格行校验 + 违规明细生成
// 规则: ERROR 跳过该行；WARNING 保留；CONFLICT 保留首行
// ==========================================

use crate::domain::catalog::{BaseColor, CatalogRow, PriceSheet};
use crate::domain::dq::{DqLevel, DqViolation};
use crate::domain::types::{Currency, Market, PriceKind};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::{
    DataCleaner as DataCleanerTrait, DqValidator as DqValidatorTrait, RawCatalogRecord,
    RawPriceRecord,
};
use std::collections::{HashMap, HashSet};

pub struct DqValidator {
    cleaner: DataCleaner,
}

impl DqValidator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    fn violation(
        source: &str,
        row_number: usize,
        key: Option<&str>,
        level: DqLevel,
        field: &str,
        message: String,
    ) -> DqViolation {
        DqViolation {
            source: source.to_string(),
            row_number,
            key: key.map(str::to_string),
            level,
            field: field.to_string(),
            message,
        }
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl DqValidatorTrait for DqValidator {
    fn validate_catalog(
        &self,
        source: &str,
        records: Vec<RawCatalogRecord>,
    ) -> (Vec<CatalogRow>, Vec<DqViolation>) {
        let mut rows = Vec::with_capacity(records.len());
        let mut violations = Vec::new();
        let mut seen_items: HashSet<String> = HashSet::new();

        for record in records {
            let row_number = record.row_number;

            // 主键缺失
            let Some(item_no) = self.cleaner.normalize_null(record.item_no) else {
                violations.push(Self::violation(
                    source,
                    row_number,
                    None,
                    DqLevel::Warning,
                    "item_no",
                    "item_no 缺失,该行不可选".to_string(),
                ));
                continue;
            };

            // 主键重复（保留首行）
            if seen_items.contains(&item_no) {
                violations.push(Self::violation(
                    source,
                    row_number,
                    Some(&item_no),
                    DqLevel::Conflict,
                    "item_no",
                    format!("重复 item_no '{}',保留首次出现的行", item_no),
                ));
                continue;
            }

            // 组合键必填属性
            let required = [
                ("product_family", self.cleaner.normalize_null(record.product_family)),
                ("product_type", self.cleaner.normalize_null(record.product_type)),
                ("product_model", self.cleaner.normalize_null(record.product_model)),
                ("upholstery_type", self.cleaner.normalize_null(record.upholstery_type)),
                ("color", self.cleaner.normalize_null(record.color)),
            ];
            let missing: Vec<&str> = required
                .iter()
                .filter(|(_, value)| value.is_none())
                .map(|(field, _)| *field)
                .collect();
            if !missing.is_empty() {
                violations.push(Self::violation(
                    source,
                    row_number,
                    Some(&item_no),
                    DqLevel::Error,
                    &missing.join(","),
                    "组合键属性缺失,该行未导入".to_string(),
                ));
                continue;
            }
            let [family, product_type, model, upholstery, color] =
                required.map(|(_, value)| value.unwrap_or_default());

            let article_no = self.cleaner.normalize_null(record.article_no);
            if article_no.is_none() {
                violations.push(Self::violation(
                    source,
                    row_number,
                    Some(&item_no),
                    DqLevel::Warning,
                    "article_no",
                    "article_no 缺失,导出时无法查价".to_string(),
                ));
            }

            let market = self
                .cleaner
                .normalize_null(record.market)
                .map(|m| Market::parse(&m))
                .unwrap_or_default();

            seen_items.insert(item_no.clone());
            rows.push(CatalogRow {
                item_no,
                article_no,
                product_family: family,
                product_type,
                product_model: model,
                sofa_direction: self.cleaner.normalize_null(record.sofa_direction),
                upholstery_type: upholstery,
                color,
                base_color: BaseColor::from(self.cleaner.normalize_null(record.base_color)),
                market,
                image_url: self.cleaner.normalize_null(record.image_url),
                extra: record.extra,
                row_number,
            });
        }

        (rows, violations)
    }

    fn build_price_sheet(
        &self,
        source: &str,
        kind: PriceKind,
        currencies: &[Currency],
        records: Vec<RawPriceRecord>,
    ) -> (PriceSheet, Vec<DqViolation>) {
        let mut sheet = PriceSheet::new(kind, currencies.iter().copied().collect());
        let mut violations = Vec::new();

        for record in records {
            let row_number = record.row_number;

            let Some(article_no) = self.cleaner.normalize_null(record.article_no) else {
                violations.push(Self::violation(
                    source,
                    row_number,
                    None,
                    DqLevel::Warning,
                    "article_no",
                    "article_no 缺失,该价格行已忽略".to_string(),
                ));
                continue;
            };

            let mut prices = HashMap::new();
            for (currency, raw) in record.prices {
                let value = match self.cleaner.parse_price(raw.as_deref()) {
                    Ok(value) => value,
                    Err(message) => {
                        violations.push(Self::violation(
                            source,
                            row_number,
                            Some(&article_no),
                            DqLevel::Warning,
                            currency.label(),
                            message,
                        ));
                        None
                    }
                };
                prices.insert(currency, value);
            }

            if !sheet.insert(&article_no, prices) {
                violations.push(Self::violation(
                    source,
                    row_number,
                    Some(&article_no),
                    DqLevel::Conflict,
                    "article_no",
                    format!("重复 article_no '{}',保留首次出现的行", article_no),
                ));
            }
        }

        (sheet, violations)
    }
}
