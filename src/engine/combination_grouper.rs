// ==========================================
// M2O 主数据配置系统 - 组合分组器
// ==========================================
// 职责: 由过滤后的目录行推导通用组合,标记需要底座颜色消歧的组合
// 规则: 六元键逐字段精确匹配；空方向只等于空方向
// 生命周期: 每次切换币种重新计算
// ==========================================

use crate::domain::catalog::CatalogRow;
use crate::domain::combination::{CombinationKey, DisplayName, GenericCombination};
use crate::domain::types::Currency;
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// CombinationIndex - 当前币种下的组合索引
// ==========================================
#[derive(Debug, Clone)]
pub struct CombinationIndex {
    currency: Currency,
    combinations: Vec<GenericCombination>, // 按首次出现顺序
    positions: HashMap<CombinationKey, usize>,
}

impl CombinationIndex {
    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn combinations(&self) -> &[GenericCombination] {
        &self.combinations
    }

    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    pub fn get(&self, key: &CombinationKey) -> Option<&GenericCombination> {
        self.positions.get(key).map(|&idx| &self.combinations[idx])
    }

    pub fn contains(&self, key: &CombinationKey) -> bool {
        self.positions.contains_key(key)
    }

    /// 某产品家族下的全部组合
    pub fn family_combinations<'a>(
        &'a self,
        family: &'a str,
    ) -> impl Iterator<Item = &'a GenericCombination> + 'a {
        self.combinations
            .iter()
            .filter(move |c| c.key.product_family == family)
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.family_combinations(family).next().is_some()
    }

    /// 需要消歧的组合
    pub fn flagged(&self) -> impl Iterator<Item = &GenericCombination> {
        self.combinations.iter().filter(|c| c.needs_disambiguation())
    }
}

// ==========================================
// CombinationGrouper - 分组纯函数
// ==========================================
pub struct CombinationGrouper;

impl CombinationGrouper {
    /// 对市场过滤后的行分组
    pub fn group(rows: &[&CatalogRow], currency: Currency) -> CombinationIndex {
        let mut combinations: Vec<GenericCombination> = Vec::new();
        let mut positions: HashMap<CombinationKey, usize> = HashMap::new();

        for row in rows {
            let key = row.combination_key();
            let idx = match positions.get(&key) {
                Some(&idx) => idx,
                None => {
                    let idx = combinations.len();
                    combinations.push(GenericCombination {
                        display_name: DisplayName::build(
                            &row.product_type,
                            &row.product_model,
                            row.sofa_direction.as_deref(),
                        ),
                        key: key.clone(),
                        candidate_base_colors: Vec::new(),
                        member_count: 0,
                    });
                    positions.insert(key, idx);
                    idx
                }
            };

            let combination = &mut combinations[idx];
            combination.member_count += 1;
            if !combination.is_candidate(&row.base_color) {
                combination.candidate_base_colors.push(row.base_color.clone());
            }
        }

        debug!(
            currency = %currency,
            combinations = combinations.len(),
            flagged = combinations.iter().filter(|c| c.needs_disambiguation()).count(),
            "组合分组完成"
        );

        CombinationIndex {
            currency,
            combinations,
            positions,
        }
    }
}
