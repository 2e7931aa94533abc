// ==========================================
// M2O 主数据配置系统 - 价格解析器
// ==========================================
// 职责: 按币种选择价格表与列,为每个定稿单品查批发价 / 零售价
// 规则: 以 article_no 关联；查价失败 → 价格为空 + 警告,不中止
// 红线: 价格数值原样透传,不取整、不换算
// ==========================================

use crate::domain::catalog::{PriceLookup, PriceTable};
use crate::domain::combination::DisplayName;
use crate::domain::finalized::{FinalizedItem, ResolvedSku};
use crate::domain::issue::PipelineIssue;
use crate::domain::types::{Currency, PriceKind};
use crate::engine::error::{EngineError, EngineResult};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct PricingResult {
    pub items: Vec<FinalizedItem>,
    pub issues: Vec<PipelineIssue>,
}

pub struct PriceResolver;

impl PriceResolver {
    /// 确认价格表包含该币种列（缺列属于配置错误）
    pub fn ensure_columns(table: &PriceTable, currency: Currency) -> EngineResult<()> {
        for kind in [PriceKind::Wholesale, PriceKind::Retail] {
            if !table.sheet(kind).has_currency(currency) {
                return Err(EngineError::PriceColumnMissing { currency, kind });
            }
        }
        Ok(())
    }

    /// 为定稿单品查价
    ///
    /// # 参数
    /// - skus: 定稿后的具体目录行（顺序保持不变）
    /// - table: 币种所属区域的价格表
    /// - currency: 导出币种
    pub fn resolve(
        skus: Vec<ResolvedSku>,
        table: &PriceTable,
        currency: Currency,
    ) -> EngineResult<PricingResult> {
        if table.region != currency.region() {
            return Err(EngineError::PriceRegionMismatch {
                currency,
                region: table.region,
            });
        }
        Self::ensure_columns(table, currency)?;

        let mut result = PricingResult::default();

        for sku in skus {
            let wholesale = Self::lookup(&sku, table, PriceKind::Wholesale, currency, &mut result);
            let retail = Self::lookup(&sku, table, PriceKind::Retail, currency, &mut result);

            result.items.push(FinalizedItem {
                display_name: DisplayName::build(
                    &sku.row.product_type,
                    &sku.row.product_model,
                    sku.row.sofa_direction.as_deref(),
                ),
                combination: sku.combination,
                row: sku.row,
                wholesale_price: wholesale,
                retail_price: retail,
            });
        }

        debug!(
            items = result.items.len(),
            price_warnings = result.issues.len(),
            "查价完成"
        );
        Ok(result)
    }

    fn lookup(
        sku: &ResolvedSku,
        table: &PriceTable,
        kind: PriceKind,
        currency: Currency,
        result: &mut PricingResult,
    ) -> Option<f64> {
        let article_no = sku.row.article_no.as_deref();
        let lookup = match article_no {
            Some(article) => table.sheet(kind).lookup(article, currency),
            None => PriceLookup::MissingArticle,
        };

        match lookup {
            PriceLookup::Found(value) => Some(value),
            miss => {
                warn!(
                    item_no = %sku.item_no(),
                    article_no = %article_no.unwrap_or("-"),
                    price_kind = %kind,
                    currency = %currency,
                    "查价失败,价格留空"
                );
                result.issues.push(PipelineIssue::price_missing(
                    sku.item_no(),
                    article_no,
                    kind,
                    currency,
                    miss,
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{BaseColor, CatalogRow, PriceSheet};
    use crate::domain::issue::IssueKind;
    use crate::domain::types::{Market, Region};
    use std::collections::{BTreeSet, HashMap};

    fn sku(item_no: &str, article_no: Option<&str>) -> ResolvedSku {
        let row = CatalogRow {
            item_no: item_no.to_string(),
            article_no: article_no.map(str::to_string),
            product_family: "Outline".to_string(),
            product_type: "Sofa".to_string(),
            product_model: "3-seater".to_string(),
            sofa_direction: None,
            upholstery_type: "Fiord".to_string(),
            color: "151".to_string(),
            base_color: BaseColor::new("Black"),
            market: Market::Eu,
            image_url: None,
            extra: Default::default(),
            row_number: 2,
        };
        ResolvedSku {
            combination: row.combination_key(),
            base_color: row.base_color.clone(),
            row,
        }
    }

    fn sheet(kind: PriceKind, entries: &[(&str, f64)]) -> PriceSheet {
        let currencies: BTreeSet<Currency> = [Currency::Eur, Currency::Dkk].into_iter().collect();
        let mut sheet = PriceSheet::new(kind, currencies);
        for (article, price) in entries {
            let mut prices = HashMap::new();
            prices.insert(Currency::Eur, Some(*price));
            prices.insert(Currency::Dkk, Some(*price * 7.46));
            sheet.insert(article, prices);
        }
        sheet
    }

    fn eu_table() -> PriceTable {
        PriceTable {
            region: Region::Eu,
            wholesale: sheet(PriceKind::Wholesale, &[("A200", 100.0)]),
            retail: sheet(PriceKind::Retail, &[("A100", 299.95), ("A200", 199.0)]),
        }
    }

    #[test]
    fn test_missing_wholesale_article_keeps_retail() {
        let result =
            PriceResolver::resolve(vec![sku("1001", Some("A100"))], &eu_table(), Currency::Eur)
                .unwrap();

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].wholesale_price, None);
        assert_eq!(result.items[0].retail_price, Some(299.95));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].kind, IssueKind::PriceMissing);
        assert_eq!(result.issues[0].price_kind, Some(PriceKind::Wholesale));
        assert_eq!(result.issues[0].item_no.as_deref(), Some("1001"));
    }

    #[test]
    fn test_prices_passed_through_unmodified() {
        let result =
            PriceResolver::resolve(vec![sku("1002", Some("A200"))], &eu_table(), Currency::Dkk)
                .unwrap();

        assert_eq!(result.items[0].wholesale_price, Some(100.0 * 7.46));
        assert_eq!(result.items[0].retail_price, Some(199.0 * 7.46));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_missing_article_no_warns_for_both_prices() {
        let result =
            PriceResolver::resolve(vec![sku("1003", None)], &eu_table(), Currency::Eur).unwrap();

        assert_eq!(result.items[0].wholesale_price, None);
        assert_eq!(result.items[0].retail_price, None);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_missing_currency_column_is_config_error() {
        let result = PriceResolver::resolve(vec![], &eu_table(), Currency::Sek);
        assert_eq!(
            result.unwrap_err(),
            EngineError::PriceColumnMissing {
                currency: Currency::Sek,
                kind: PriceKind::Wholesale
            }
        );
    }

    #[test]
    fn test_price_table_of_other_region_rejected() {
        let result =
            PriceResolver::resolve(vec![sku("1001", Some("A100"))], &eu_table(), Currency::Gbp);
        assert_eq!(
            result.unwrap_err(),
            EngineError::PriceRegionMismatch {
                currency: Currency::Gbp,
                region: Region::Eu
            }
        );
    }
}
