// ==========================================
// M2O 主数据配置系统 - 字段映射器实现
// ==========================================
// 职责: 源列 → 标准字段映射（按标准化列名 + 别名匹配）
// ==========================================

use crate::domain::catalog::{normalize_header, CatalogField};
use crate::domain::types::Currency;
use crate::importer::importer_trait::{
    FieldMapper as FieldMapperTrait, RawCatalogRecord, RawPriceRecord, RawRow,
};
use std::collections::HashMap;

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn map_catalog_record(&self, row: &RawRow) -> RawCatalogRecord {
        let normalized = self.normalize_row(row);
        let get = |field: CatalogField| self.get_string(&normalized, field.aliases());

        // 非标准字段的列保留为附加列
        let extra = normalized
            .iter()
            .filter(|(header, _)| {
                !CatalogField::ALL
                    .iter()
                    .any(|f| f.aliases().contains(&header.as_str()))
            })
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();

        RawCatalogRecord {
            // 主键
            item_no: get(CatalogField::ItemNo),
            article_no: get(CatalogField::ArticleNo),

            // 组合键属性
            product_family: get(CatalogField::ProductFamily),
            product_type: get(CatalogField::ProductType),
            product_model: get(CatalogField::ProductModel),
            sofa_direction: get(CatalogField::SofaDirection),
            upholstery_type: get(CatalogField::UpholsteryType),
            color: get(CatalogField::Color),

            // 其他属性
            base_color: get(CatalogField::BaseColor),
            market: get(CatalogField::Market),
            image_url: get(CatalogField::ImageUrl),
            extra,

            // 元信息
            row_number: row.row_number,
        }
    }

    fn map_price_record(
        &self,
        row: &RawRow,
        currency_columns: &[(Currency, String)],
    ) -> RawPriceRecord {
        let normalized = self.normalize_row(row);

        let prices = currency_columns
            .iter()
            .map(|(currency, header)| {
                let value = self.get_string(&normalized, &[normalize_header(header).as_str()]);
                (*currency, value)
            })
            .collect();

        RawPriceRecord {
            article_no: self.get_string(&normalized, CatalogField::ArticleNo.aliases()),
            prices,
            row_number: row.row_number,
        }
    }
}

impl FieldMapper {
    /// 标准化列名 → 值（同名列以先出现者为准）
    fn normalize_row<'a>(&self, row: &'a RawRow) -> HashMap<String, &'a str> {
        let mut normalized = HashMap::new();
        for (header, value) in &row.values {
            normalized
                .entry(normalize_header(header))
                .or_insert(value.as_str());
        }
        normalized
    }

    /// 提取字符串字段（返回 Option）,按别名顺序尝试
    fn get_string(&self, row: &HashMap<String, &str>, aliases: &[&str]) -> Option<String> {
        for alias in aliases {
            if let Some(v) = row.get(*alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }
}

/// 表头中是否存在某字段的任一别名列
pub fn has_column(headers: &[String], aliases: &[&str]) -> bool {
    headers
        .iter()
        .any(|h| aliases.contains(&normalize_header(h).as_str()))
}
