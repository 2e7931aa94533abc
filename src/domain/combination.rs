// ==========================================
// M2O 主数据配置系统 - 通用组合领域模型
// ==========================================
// 通用组合 = 除底座颜色外所有属性相同的目录行集合
// 红线: 显示名称只用于展示,不得作为关联键
// ==========================================

use crate::domain::catalog::BaseColor;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CombinationKey - 六元组合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombinationKey {
    pub product_family: String,
    pub product_type: String,
    pub product_model: String,
    #[serde(default)]
    pub sofa_direction: Option<String>,
    pub upholstery_type: String,
    pub color: String,
}

impl fmt::Display for CombinationKey {
    // 用于错误归因,不是展示标签
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}",
            self.product_family,
            self.product_type,
            self.product_model,
            self.sofa_direction.as_deref().unwrap_or("-"),
            self.upholstery_type,
            self.color
        )
    }
}

// ==========================================
// DisplayName - 展示名称
// ==========================================
// 不实现 From/Into CombinationKey,避免标签被误用为键
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// 产品类型 + 型号,沙发方向非空时追加
    pub fn build(product_type: &str, product_model: &str, sofa_direction: Option<&str>) -> Self {
        let mut name = format!("{} {}", product_type.trim(), product_model.trim())
            .trim()
            .to_string();
        if let Some(direction) = sofa_direction.map(str::trim).filter(|d| !d.is_empty()) {
            name.push_str(" - ");
            name.push_str(direction);
        }
        DisplayName(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// GenericCombination - 通用组合
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct GenericCombination {
    pub key: CombinationKey,
    pub display_name: DisplayName,
    // 候选底座颜色（去重,按源表首次出现顺序,至少一个）
    pub candidate_base_colors: Vec<BaseColor>,
    pub member_count: usize,
}

impl GenericCombination {
    /// 候选底座颜色多于一个时需要用户消歧
    pub fn needs_disambiguation(&self) -> bool {
        self.candidate_base_colors.len() > 1
    }

    /// 无需消歧时隐式附带的唯一底座颜色
    pub fn implicit_base_color(&self) -> Option<&BaseColor> {
        match self.candidate_base_colors.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn is_candidate(&self, color: &BaseColor) -> bool {
        self.candidate_base_colors.contains(color)
    }
}
