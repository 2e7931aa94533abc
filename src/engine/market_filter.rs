// ==========================================
// M2O 主数据配置系统 - 市场过滤器
// ==========================================
// 规则: EU 区域币种排除 market = "UK"；UK/IE 区域币种排除 market = "EU"
//       其他 market 值始终保留
// 红线: 稳定过滤,保持源表顺序
// ==========================================

use crate::domain::catalog::CatalogRow;
use crate::domain::types::Currency;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

pub struct MarketFilter;

impl MarketFilter {
    /// 按币种所属区域过滤目录行
    pub fn filter(rows: &[CatalogRow], currency: Currency) -> Vec<&CatalogRow> {
        let region = currency.region();
        let visible: Vec<&CatalogRow> = rows
            .iter()
            .filter(|row| row.market.is_visible_in(region))
            .collect();

        debug!(
            currency = %currency,
            total = rows.len(),
            visible = visible.len(),
            "市场过滤完成"
        );
        visible
    }

    /// 按币种标签过滤；未识别币种为配置错误
    pub fn filter_by_label<'a>(
        rows: &'a [CatalogRow],
        currency_label: &str,
    ) -> EngineResult<Vec<&'a CatalogRow>> {
        let currency = parse_currency(currency_label)?;
        Ok(Self::filter(rows, currency))
    }
}

/// 解析币种标签（未识别即报错,不回落到任何区域）
pub fn parse_currency(label: &str) -> EngineResult<Currency> {
    label
        .parse::<Currency>()
        .map_err(|e| EngineError::UnknownCurrency(e.0))
}
