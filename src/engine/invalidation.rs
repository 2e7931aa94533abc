// ==========================================
// M2O 主数据配置系统 - 币种切换失效处理
// ==========================================
// 规则: 切换币种后重新分组,丢弃与被过滤掉的行相关的选择
//       - 已选组合不在新索引中 → 丢弃（含序号与覆盖）
//       - 单组合覆盖: 组合不再需要消歧 → 丢弃；颜色收窄到新候选
//         收窄后为空 → 保留为显式空覆盖,组合保持未解析
//       - 家族级颜色: 不再是该家族任何需消歧组合的候选 → 丢弃
//       - 已移除单品不在新可见行中 → 丢弃
// ==========================================

use crate::domain::catalog::{BaseColor, CatalogRow};
use crate::domain::selection::{SelectionInvalidation, UserSelection};
use crate::engine::combination_grouper::CombinationIndex;
use std::collections::HashSet;
use tracing::{info, warn};

pub struct SelectionInvalidator;

impl SelectionInvalidator {
    /// 将选择迁移到新币种
    ///
    /// # 参数
    /// - selection: 用户选择（原地修改,币种更新为 index 的币种）
    /// - index: 新币种下的组合索引
    /// - visible_rows: 新币种下市场过滤后的目录行
    pub fn apply(
        selection: &mut UserSelection,
        index: &CombinationIndex,
        visible_rows: &[&CatalogRow],
    ) -> SelectionInvalidation {
        let mut invalidation = SelectionInvalidation::default();
        let from = selection.currency();

        // === 已选组合 ===
        for key in selection.selected_keys() {
            if !index.contains(&key) {
                selection.forget_combination(&key);
                invalidation.dropped_combinations.push(key);
            }
        }

        // === 单组合覆盖 ===
        for (key, colors) in selection.override_entries() {
            let Some(combination) = index.get(&key).filter(|c| c.needs_disambiguation()) else {
                selection.clear_combination_override(&key);
                invalidation.dropped_overrides.push(key);
                continue;
            };

            let narrowed: Vec<BaseColor> = colors
                .iter()
                .filter(|c| combination.is_candidate(c))
                .cloned()
                .collect();
            if narrowed.len() != colors.len() {
                // 空覆盖不回退到家族默认
                selection.set_combination_override(key.clone(), &narrowed);
                invalidation.dropped_overrides.push(key);
            }
        }

        // === 家族级颜色 ===
        for (family, colors) in selection.family_entries() {
            let (kept, dropped): (Vec<BaseColor>, Vec<BaseColor>) =
                colors.into_iter().partition(|color| {
                    index
                        .family_combinations(&family)
                        .any(|c| c.needs_disambiguation() && c.is_candidate(color))
                });
            if !dropped.is_empty() {
                invalidation
                    .dropped_family_colors
                    .extend(dropped.into_iter().map(|c| (family.clone(), c)));
                selection.set_family_base_colors(&family, &kept);
            }
        }

        // === 已移除单品 ===
        let visible_items: HashSet<&str> = visible_rows.iter().map(|r| r.item_no.as_str()).collect();
        invalidation.dropped_removed_items =
            selection.retain_removed_items(|item| visible_items.contains(item));

        selection.set_currency(index.currency());

        if invalidation.is_empty() {
            info!(from = %from, to = %index.currency(), "切换币种,选择全部保留");
        } else {
            warn!(
                from = %from,
                to = %index.currency(),
                combinations = invalidation.dropped_combinations.len(),
                overrides = invalidation.dropped_overrides.len(),
                family_colors = invalidation.dropped_family_colors.len(),
                removed_items = invalidation.dropped_removed_items.len(),
                "切换币种,部分选择已失效"
            );
        }
        invalidation
    }
}
