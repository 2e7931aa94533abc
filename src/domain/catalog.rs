// ==========================================
// M2O 主数据配置系统 - 目录与价格表领域模型
// ==========================================
// 用途: 导入层写入,引擎层只读
// 生命周期: 每个会话加载一次,加载后不可变
// ==========================================

use crate::domain::combination::CombinationKey;
use crate::domain::types::{Currency, Market, PriceKind, Region};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// 列名标准化（忽略大小写与非字母数字字符）
///
/// "Item No." / "item_no" / "ItemNo" → "itemno"
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

// ==========================================
// CatalogField - 目录标准字段
// ==========================================
// 导入映射与导出模板共用同一套列名别名（别名均为标准化形式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogField {
    ItemNo,
    ArticleNo,
    ProductFamily,
    ProductType,
    ProductModel,
    SofaDirection,
    UpholsteryType,
    Color,
    BaseColor,
    Market,
    ImageUrl,
}

impl CatalogField {
    pub const ALL: [CatalogField; 11] = [
        CatalogField::ItemNo,
        CatalogField::ArticleNo,
        CatalogField::ProductFamily,
        CatalogField::ProductType,
        CatalogField::ProductModel,
        CatalogField::SofaDirection,
        CatalogField::UpholsteryType,
        CatalogField::Color,
        CatalogField::BaseColor,
        CatalogField::Market,
        CatalogField::ImageUrl,
    ];

    /// 标准列名
    pub fn canonical_header(&self) -> &'static str {
        match self {
            CatalogField::ItemNo => "Item No",
            CatalogField::ArticleNo => "Article No",
            CatalogField::ProductFamily => "Product Family",
            CatalogField::ProductType => "Product Type",
            CatalogField::ProductModel => "Product Model",
            CatalogField::SofaDirection => "Sofa Direction",
            CatalogField::UpholsteryType => "Upholstery Type",
            CatalogField::Color => "Color",
            CatalogField::BaseColor => "Base Color",
            CatalogField::Market => "Market",
            CatalogField::ImageUrl => "Image URL",
        }
    }

    /// 列名别名（标准化形式）
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CatalogField::ItemNo => &["itemno", "itemnumber", "itemid", "sku", "skuno"],
            CatalogField::ArticleNo => &["articleno", "articlenumber", "article", "artno"],
            CatalogField::ProductFamily => &["productfamily", "family"],
            CatalogField::ProductType => &["producttype", "type"],
            CatalogField::ProductModel => &["productmodel", "model"],
            CatalogField::SofaDirection => &["sofadirection", "direction"],
            CatalogField::UpholsteryType => &["upholsterytype", "upholstery"],
            CatalogField::Color => &["color", "colour", "upholsterycolor", "upholsterycolour"],
            CatalogField::BaseColor => &["basecolor", "basecolour", "base"],
            CatalogField::Market => &[
                "market",
                "currency",
                "pricecurrency",
                "salescurrency",
                "currencymarket",
                "marketcurrency",
                "salesmarket",
            ],
            CatalogField::ImageUrl => &["imageurl", "image", "imagelink", "imageurls"],
        }
    }

    /// 目录表中必须存在的列
    pub fn is_required_column(&self) -> bool {
        !matches!(
            self,
            CatalogField::SofaDirection
                | CatalogField::BaseColor
                | CatalogField::Market
                | CatalogField::ImageUrl
        )
    }

    /// 按列名识别字段
    pub fn from_header(header: &str) -> Option<CatalogField> {
        let normalized = normalize_header(header);
        CatalogField::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&normalized.as_str()))
    }

    /// 读取目录行上的字段值（空值返回 None）
    pub fn value_of(&self, row: &CatalogRow) -> Option<String> {
        let value = match self {
            CatalogField::ItemNo => Some(row.item_no.clone()),
            CatalogField::ArticleNo => row.article_no.clone(),
            CatalogField::ProductFamily => Some(row.product_family.clone()),
            CatalogField::ProductType => Some(row.product_type.clone()),
            CatalogField::ProductModel => Some(row.product_model.clone()),
            CatalogField::SofaDirection => row.sofa_direction.clone(),
            CatalogField::UpholsteryType => Some(row.upholstery_type.clone()),
            CatalogField::Color => Some(row.color.clone()),
            CatalogField::BaseColor => row.base_color.as_deref().map(str::to_string),
            CatalogField::Market => Some(row.market.to_string()),
            CatalogField::ImageUrl => row.image_url.clone(),
        };
        value.filter(|v| !v.is_empty())
    }
}

// ==========================================
// BaseColor - 底座颜色
// ==========================================
// 空值是合法的取值（无底座的产品），与任何非空颜色不相等
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseColor(Option<String>);

impl BaseColor {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            BaseColor(None)
        } else {
            BaseColor(Some(trimmed.to_string()))
        }
    }

    pub fn none() -> Self {
        BaseColor(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl From<&str> for BaseColor {
    fn from(raw: &str) -> Self {
        BaseColor::new(raw)
    }
}

impl From<Option<String>> for BaseColor {
    fn from(raw: Option<String>) -> Self {
        raw.map(|v| BaseColor::new(&v)).unwrap_or_default()
    }
}

impl fmt::Display for BaseColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(v) => f.write_str(v),
            None => write!(f, "(无底座颜色)"),
        }
    }
}

// ==========================================
// CatalogRow - 目录行（具体可售商品）
// ==========================================
// 红线: item_no 全局唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    // ===== 主键 =====
    pub item_no: String,

    // ===== 定价关联键 =====
    pub article_no: Option<String>,

    // ===== 组合键属性 =====
    pub product_family: String,
    pub product_type: String,
    pub product_model: String,
    pub sofa_direction: Option<String>,
    pub upholstery_type: String,
    pub color: String,

    // ===== 其他属性 =====
    pub base_color: BaseColor,
    pub market: Market,
    pub image_url: Option<String>,

    // 原始表中的其他列（标准化列名 → 值）
    #[serde(default)]
    pub extra: BTreeMap<String, String>,

    // 元信息
    pub row_number: usize,
}

impl CatalogRow {
    /// 六元组合键（不含底座颜色）
    pub fn combination_key(&self) -> CombinationKey {
        CombinationKey {
            product_family: self.product_family.clone(),
            product_type: self.product_type.clone(),
            product_model: self.product_model.clone(),
            sofa_direction: self.sofa_direction.clone(),
            upholstery_type: self.upholstery_type.clone(),
            color: self.color.clone(),
        }
    }

    /// 是否匹配组合键（逐字段精确匹配,空方向只匹配空方向）
    pub fn matches(&self, key: &CombinationKey) -> bool {
        self.product_family == key.product_family
            && self.product_type == key.product_type
            && self.product_model == key.product_model
            && self.sofa_direction == key.sofa_direction
            && self.upholstery_type == key.upholstery_type
            && self.color == key.color
    }

    /// 按原始列名读取附加列
    pub fn extra_value(&self, header: &str) -> Option<&str> {
        self.extra
            .get(&normalize_header(header))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// PriceLookup - 单元格查价结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceLookup {
    Found(f64),
    BlankCell,      // 货号存在,但该币种单元格为空
    MissingArticle, // 货号不在价格表中
    MissingColumn,  // 价格表无此币种列
}

// ==========================================
// PriceSheet - 价格表中的一个工作表（批发或零售）
// ==========================================
// 红线: article_no 在同一工作表内唯一
#[derive(Debug, Clone)]
pub struct PriceSheet {
    pub kind: PriceKind,
    currencies: BTreeSet<Currency>,
    entries: HashMap<String, HashMap<Currency, Option<f64>>>,
}

impl PriceSheet {
    pub fn new(kind: PriceKind, currencies: BTreeSet<Currency>) -> Self {
        Self {
            kind,
            currencies,
            entries: HashMap::new(),
        }
    }

    /// 写入一行价格；若货号已存在则保留先出现的记录并返回 false
    pub fn insert(&mut self, article_no: &str, prices: HashMap<Currency, Option<f64>>) -> bool {
        if self.entries.contains_key(article_no) {
            return false;
        }
        self.entries.insert(article_no.to_string(), prices);
        true
    }

    pub fn has_currency(&self, currency: Currency) -> bool {
        self.currencies.contains(&currency)
    }

    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.currencies.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按货号 + 币种查价,数值原样返回
    pub fn lookup(&self, article_no: &str, currency: Currency) -> PriceLookup {
        if !self.has_currency(currency) {
            return PriceLookup::MissingColumn;
        }
        match self.entries.get(article_no) {
            None => PriceLookup::MissingArticle,
            Some(prices) => match prices.get(&currency).copied().flatten() {
                Some(value) => PriceLookup::Found(value),
                None => PriceLookup::BlankCell,
            },
        }
    }
}

// ==========================================
// PriceTable - 单个区域的价格表
// ==========================================
#[derive(Debug, Clone)]
pub struct PriceTable {
    pub region: Region,
    pub wholesale: PriceSheet,
    pub retail: PriceSheet,
}

impl PriceTable {
    pub fn sheet(&self, kind: PriceKind) -> &PriceSheet {
        match kind {
            PriceKind::Wholesale => &self.wholesale,
            PriceKind::Retail => &self.retail,
        }
    }
}

// ==========================================
// Catalog - 会话级只读目录
// ==========================================
#[derive(Debug, Clone)]
pub struct Catalog {
    pub rows: Vec<CatalogRow>,
    pub eu_prices: PriceTable,
    pub uk_prices: PriceTable,
    // 原始目录表的列名（用于识别模板中的透传列）
    pub source_columns: Vec<String>,
}

impl Catalog {
    pub fn price_table(&self, region: Region) -> &PriceTable {
        match region {
            Region::Eu => &self.eu_prices,
            Region::UkIe => &self.uk_prices,
        }
    }

    /// 原始目录表中是否存在该列
    pub fn has_source_column(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.source_columns
            .iter()
            .any(|c| normalize_header(c) == normalized)
    }
}
