// ==========================================
// M2O 主数据配置系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 文件解析 → 字段映射 → 清洗 → 数据质量校验
// ==========================================

use crate::domain::catalog::{CatalogRow, PriceSheet};
use crate::domain::dq::DqViolation;
use crate::domain::types::{Currency, PriceKind};
use crate::importer::error::ImportResult;
use std::collections::BTreeMap;
use std::path::Path;

// ==========================================
// RawSheet / RawRow - 解析后的原始表格
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RawSheet {
    pub source: String,       // 数据源描述（文件路径 + 工作表）
    pub headers: Vec<String>, // 表头（已 TRIM,保留原始大小写）
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub row_number: usize,              // 原始文件行号（1 起,含表头行）
    pub values: Vec<(String, String)>,  // (表头, 已 TRIM 的值),按列顺序
}

impl RawRow {
    /// 按原始表头取值
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }
}

// ==========================================
// RawCatalogRecord - 目录导入中间结构体
// ==========================================
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCatalogRecord {
    pub item_no: Option<String>,
    pub article_no: Option<String>,
    pub product_family: Option<String>,
    pub product_type: Option<String>,
    pub product_model: Option<String>,
    pub sofa_direction: Option<String>,
    pub upholstery_type: Option<String>,
    pub color: Option<String>,
    pub base_color: Option<String>,
    pub market: Option<String>,
    pub image_url: Option<String>,
    pub extra: BTreeMap<String, String>,
    pub row_number: usize,
}

// ==========================================
// RawPriceRecord - 价格导入中间结构体
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceRecord {
    pub article_no: Option<String>,
    pub prices: Vec<(Currency, Option<String>)>,
    pub row_number: usize,
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析指定工作表为原始行记录
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - sheet: 工作表名（None = 第一个工作表；CSV 忽略）
    fn parse_sheet(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<RawSheet>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 原始行 → 目录中间结构（列名按别名匹配）
    fn map_catalog_record(&self, row: &RawRow) -> RawCatalogRecord;

    /// 原始行 → 价格中间结构
    ///
    /// # 参数
    /// - currency_columns: (币种, 表头) 列表
    fn map_price_record(&self, row: &RawRow, currency_columns: &[(Currency, String)])
        -> RawPriceRecord;
}

// ==========================================
// DataCleaner Trait
// ==========================================
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白/"nan" → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 解析价格单元格
    ///
    /// # 返回
    /// - Ok(None): 空单元格
    /// - Ok(Some(f64)): 数值（原样,不取整）
    /// - Err(String): 非数值
    fn parse_price(&self, value: Option<&str>) -> Result<Option<f64>, String>;
}

// ==========================================
// DqValidator Trait
// ==========================================
pub trait DqValidator: Send + Sync {
    /// 校验目录中间记录,返回通过的目录行与违规明细
    ///
    /// # 规则
    /// - item_no 缺失 → WARNING,跳过
    /// - item_no 重复 → CONFLICT,保留首行
    /// - 组合键必填属性缺失 → ERROR,跳过
    /// - article_no 缺失 → WARNING,保留（后续查价缺失）
    fn validate_catalog(
        &self,
        source: &str,
        records: Vec<RawCatalogRecord>,
    ) -> (Vec<CatalogRow>, Vec<DqViolation>);

    /// 校验价格中间记录并构建价格工作表
    ///
    /// # 规则
    /// - article_no 缺失 → WARNING,跳过
    /// - article_no 重复 → CONFLICT,保留首行
    /// - 价格非数值 → WARNING,视为空
    fn build_price_sheet(
        &self,
        source: &str,
        kind: PriceKind,
        currencies: &[Currency],
        records: Vec<RawPriceRecord>,
    ) -> (PriceSheet, Vec<DqViolation>);
}
