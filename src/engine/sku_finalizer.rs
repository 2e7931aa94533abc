// ==========================================
// M2O 主数据配置系统 - SKU 定稿器
// ==========================================
// 职责: 将已选组合 + 有效底座颜色展开为具体目录行
// 规则: 单一候选 → 匹配六元键 + 唯一底座颜色的一行
//       需消歧 → 每个选中的底座颜色一行（N 色 → N 行）
//       找不到行 → 完整性错误（逐单品,不中止）
//       item_no 不重复；已移除的单品不输出
// 红线: 纯函数,同一输入重复执行结果一致
// ==========================================

use crate::domain::catalog::{BaseColor, CatalogRow};
use crate::domain::combination::CombinationKey;
use crate::domain::finalized::ResolvedSku;
use crate::domain::issue::PipelineIssue;
use crate::domain::selection::UserSelection;
use crate::engine::base_color_resolver::{ensure_current, BaseColorResolution, BaseColorResolver};
use crate::engine::combination_grouper::CombinationIndex;
use crate::engine::error::EngineResult;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

// ==========================================
// FinalizationResult - 定稿结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct FinalizationResult {
    pub skus: Vec<ResolvedSku>,   // 按组合首次选中顺序,组合内按底座颜色添加顺序
    pub issues: Vec<PipelineIssue>,
    pub removed_count: usize,     // 因用户移除而跳过的单品数
}

pub struct SkuFinalizer;

impl SkuFinalizer {
    /// 定稿
    ///
    /// # 参数
    /// - rows: 当前币种下市场过滤后的目录行
    /// - index: 由同一批行分组得到的组合索引
    /// - selection: 用户选择
    pub fn finalize(
        rows: &[&CatalogRow],
        index: &CombinationIndex,
        selection: &UserSelection,
    ) -> EngineResult<FinalizationResult> {
        ensure_current(selection, index)?;

        // (组合键, 底座颜色) → 匹配行（保持源表顺序）
        let mut lookup: HashMap<(CombinationKey, BaseColor), Vec<&CatalogRow>> = HashMap::new();
        for row in rows {
            lookup
                .entry((row.combination_key(), row.base_color.clone()))
                .or_default()
                .push(*row);
        }

        let mut result = FinalizationResult::default();
        let mut seen_items: HashSet<String> = HashSet::new();

        for key in selection.selected_in_order() {
            let Some(combination) = index.get(key) else {
                warn!(combination = %key, "已选组合不在当前组合索引中");
                result.issues.push(PipelineIssue::combination_not_found(key));
                continue;
            };

            let resolution = BaseColorResolver::effective_resolution(selection, combination);
            if let BaseColorResolution::Unresolved = resolution {
                warn!(combination = %key, "组合未选择底座颜色,跳过");
                result.issues.push(PipelineIssue::incomplete_selection(key));
                continue;
            }

            for color in resolution.colors() {
                let matches = lookup
                    .get(&(key.clone(), color.clone()))
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                let row = match matches {
                    [] => {
                        warn!(combination = %key, base_color = %color, "目录中缺少匹配行");
                        result.issues.push(PipelineIssue::missing_row(key, color));
                        continue;
                    }
                    [only] => *only,
                    [first, ..] => {
                        let item_nos: Vec<&str> =
                            matches.iter().map(|r| r.item_no.as_str()).collect();
                        warn!(
                            combination = %key,
                            base_color = %color,
                            item_no = %first.item_no,
                            "组合 + 底座颜色匹配到多行,使用首行"
                        );
                        result
                            .issues
                            .push(PipelineIssue::ambiguous_row(key, color, &item_nos));
                        *first
                    }
                };

                if selection.is_removed(&row.item_no) {
                    debug!(item_no = %row.item_no, "单品已被用户移除");
                    result.removed_count += 1;
                    continue;
                }

                if !seen_items.insert(row.item_no.clone()) {
                    debug!(
                        item_no = %row.item_no,
                        combination = %key,
                        "单品已由先前组合产出,跳过重复"
                    );
                    continue;
                }

                result.skus.push(ResolvedSku {
                    combination: key.clone(),
                    base_color: color.clone(),
                    row: (*row).clone(),
                });
            }
        }

        debug!(
            skus = result.skus.len(),
            issues = result.issues.len(),
            removed = result.removed_count,
            "SKU 定稿完成"
        );
        Ok(result)
    }
}
