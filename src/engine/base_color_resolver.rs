// ==========================================
// M2O 主数据配置系统 - 底座颜色解析器
// ==========================================
// 职责: 校验并记录用户选择的底座颜色,合并出每个组合的有效底座颜色
// 规则: 选择的颜色必须 ⊆ 候选底座颜色
//       家族级默认作用于该家族下所有未单独覆盖的需消歧组合
//       单组合覆盖始终优先,家族级修改不清除覆盖
//       有效颜色为空 → 未解析 → 不参与定稿并报告"选择不完整"
// ==========================================

use crate::domain::catalog::BaseColor;
use crate::domain::combination::{CombinationKey, GenericCombination};
use crate::domain::selection::UserSelection;
use crate::engine::combination_grouper::CombinationIndex;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

// ==========================================
// BaseColorResolution - 组合的有效底座颜色
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseColorResolution {
    Implicit(BaseColor),    // 单一候选,隐式附带
    Chosen(Vec<BaseColor>), // 用户选择（按添加顺序）
    Unresolved,             // 需要消歧但未选择
}

impl BaseColorResolution {
    pub fn colors(&self) -> &[BaseColor] {
        match self {
            BaseColorResolution::Implicit(color) => std::slice::from_ref(color),
            BaseColorResolution::Chosen(colors) => colors,
            BaseColorResolution::Unresolved => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, BaseColorResolution::Unresolved)
    }
}

pub struct BaseColorResolver;

impl BaseColorResolver {
    /// 设置家族级底座颜色默认值（空列表 = 清除默认值）
    pub fn set_family_base_colors(
        selection: &mut UserSelection,
        index: &CombinationIndex,
        family: &str,
        colors: &[BaseColor],
    ) -> EngineResult<()> {
        ensure_current(selection, index)?;

        if !index.has_family(family) {
            return Err(EngineError::UnknownFamily(family.to_string()));
        }

        let flagged: Vec<&GenericCombination> = index
            .family_combinations(family)
            .filter(|c| c.needs_disambiguation())
            .collect();

        if flagged.is_empty() && !colors.is_empty() {
            return Err(EngineError::NoDisambiguationInFamily(family.to_string()));
        }

        for color in colors {
            if !flagged.iter().any(|c| c.is_candidate(color)) {
                return Err(EngineError::InvalidFamilyBaseColor {
                    family: family.to_string(),
                    color: color.clone(),
                });
            }
        }

        debug!(family = %family, colors = colors.len(), "设置家族级底座颜色");
        selection.set_family_base_colors(family, colors);
        Ok(())
    }

    /// 设置单组合底座颜色覆盖（空列表 = 显式不选,组合保持未解析）
    pub fn set_combination_base_colors(
        selection: &mut UserSelection,
        index: &CombinationIndex,
        key: &CombinationKey,
        colors: &[BaseColor],
    ) -> EngineResult<()> {
        ensure_current(selection, index)?;

        let combination = index
            .get(key)
            .ok_or_else(|| EngineError::UnknownCombination(key.clone()))?;

        if !combination.needs_disambiguation() {
            return Err(EngineError::DisambiguationNotRequired(key.clone()));
        }

        for color in colors {
            if !combination.is_candidate(color) {
                return Err(EngineError::InvalidBaseColor {
                    combination: key.clone(),
                    color: color.clone(),
                });
            }
        }

        debug!(combination = %key, colors = colors.len(), "设置单组合底座颜色");
        selection.set_combination_override(key.clone(), colors);
        Ok(())
    }

    /// 合并家族级默认与单组合覆盖,得到有效底座颜色
    pub fn effective_resolution(
        selection: &UserSelection,
        combination: &GenericCombination,
    ) -> BaseColorResolution {
        if let Some(only) = combination.implicit_base_color() {
            return BaseColorResolution::Implicit(only.clone());
        }

        // 单组合覆盖优先；家族级默认只取与候选的交集,顺序保持用户添加顺序
        let chosen = selection
            .combination_override(&combination.key)
            .or_else(|| selection.family_base_colors(&combination.key.product_family))
            .unwrap_or_default();

        let colors: Vec<BaseColor> = chosen
            .iter()
            .filter(|c| combination.is_candidate(c))
            .cloned()
            .collect();

        if colors.is_empty() {
            BaseColorResolution::Unresolved
        } else {
            BaseColorResolution::Chosen(colors)
        }
    }
}

/// 组合索引必须与选择的币种一致
pub fn ensure_current(selection: &UserSelection, index: &CombinationIndex) -> EngineResult<()> {
    if index.currency() != selection.currency() {
        return Err(EngineError::StaleCombinationIndex {
            index: index.currency(),
            selection: selection.currency(),
        });
    }
    Ok(())
}
