// ==========================================
// M2O 主数据配置系统 - 定稿单品
// ==========================================
// 红线: 定稿单品只能由选择 + 目录 + 价格表重新生成,不得单独修改
// ==========================================

use crate::domain::catalog::{BaseColor, CatalogRow};
use crate::domain::combination::{CombinationKey, DisplayName};
use serde::Serialize;

// ==========================================
// ResolvedSku - 定价前的具体目录行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSku {
    pub combination: CombinationKey,
    pub base_color: BaseColor,
    pub row: CatalogRow,
}

impl ResolvedSku {
    pub fn item_no(&self) -> &str {
        &self.row.item_no
    }
}

// ==========================================
// FinalizedItem - 已定价、可导出的单品
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizedItem {
    pub combination: CombinationKey,
    pub display_name: DisplayName,
    pub row: CatalogRow,
    pub wholesale_price: Option<f64>, // 查价失败为 None
    pub retail_price: Option<f64>,
}

impl FinalizedItem {
    pub fn item_no(&self) -> &str {
        &self.row.item_no
    }
}
