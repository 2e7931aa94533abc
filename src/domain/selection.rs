// ==========================================
// M2O 主数据配置系统 - 用户选择状态
// ==========================================
// 红线: 会话级对象,由调用方持有并按引用传递,不使用全局状态
// 红线: 家族级默认与单组合覆盖分两张表存储,合并时单组合优先
// ==========================================

use crate::domain::catalog::BaseColor;
use crate::domain::combination::CombinationKey;
use crate::domain::types::Currency;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ==========================================
// UserSelection - 用户选择
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct UserSelection {
    currency: Currency,

    // 当前选中的组合
    selected: BTreeSet<CombinationKey>,

    // 首次选中序号（取消/重新选中不改变序号,决定导出行顺序）
    first_selected: HashMap<CombinationKey, u64>,
    next_sequence: u64,

    // 家族级底座颜色默认值（按用户添加顺序,不重复）
    family_base_colors: BTreeMap<String, Vec<BaseColor>>,

    // 单组合底座颜色覆盖（按用户添加顺序；空列表 = 显式未选择）
    combination_base_colors: BTreeMap<CombinationKey, Vec<BaseColor>>,

    // 导出前被用户移除的 item_no
    removed_items: BTreeSet<String>,
}

impl UserSelection {
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            selected: BTreeSet::new(),
            first_selected: HashMap::new(),
            next_sequence: 0,
            family_base_colors: BTreeMap::new(),
            combination_base_colors: BTreeMap::new(),
            removed_items: BTreeSet::new(),
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    // ===== 组合选择 =====

    /// 选中组合；返回是否为新增
    ///
    /// 该方法不校验组合是否存在于当前目录,校验由会话层负责
    pub fn select_combination(&mut self, key: CombinationKey) -> bool {
        if !self.first_selected.contains_key(&key) {
            self.first_selected.insert(key.clone(), self.next_sequence);
            self.next_sequence += 1;
        }
        self.selected.insert(key)
    }

    /// 取消选中；底座颜色覆盖保留,重新选中后继续生效
    pub fn deselect_combination(&mut self, key: &CombinationKey) -> bool {
        self.selected.remove(key)
    }

    pub fn is_selected(&self, key: &CombinationKey) -> bool {
        self.selected.contains(key)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// 按首次选中顺序返回已选组合
    pub fn selected_in_order(&self) -> Vec<&CombinationKey> {
        let mut keys: Vec<&CombinationKey> = self.selected.iter().collect();
        keys.sort_by_key(|k| self.first_selected.get(*k).copied().unwrap_or(u64::MAX));
        keys
    }

    // ===== 底座颜色 =====

    pub fn family_base_colors(&self, family: &str) -> Option<&[BaseColor]> {
        self.family_base_colors.get(family).map(Vec::as_slice)
    }

    pub fn combination_override(&self, key: &CombinationKey) -> Option<&[BaseColor]> {
        self.combination_base_colors.get(key).map(Vec::as_slice)
    }

    /// 清除单组合覆盖,回落到家族级默认
    pub fn clear_combination_override(&mut self, key: &CombinationKey) -> bool {
        self.combination_base_colors.remove(key).is_some()
    }

    // 写入需经过 BaseColorResolver 校验
    pub(crate) fn set_family_base_colors(&mut self, family: &str, colors: &[BaseColor]) {
        let ordered = keep_insertion_order(self.family_base_colors.get(family), colors);
        if ordered.is_empty() {
            self.family_base_colors.remove(family);
        } else {
            self.family_base_colors.insert(family.to_string(), ordered);
        }
    }

    pub(crate) fn set_combination_override(&mut self, key: CombinationKey, colors: &[BaseColor]) {
        let ordered = keep_insertion_order(self.combination_base_colors.get(&key), colors);
        self.combination_base_colors.insert(key, ordered);
    }

    // ===== 单品移除 =====

    /// 移除单品（幂等）；返回此前是否未被移除
    pub fn remove_item(&mut self, item_no: &str) -> bool {
        self.removed_items.insert(item_no.trim().to_string())
    }

    /// 撤销移除（幂等）
    pub fn restore_item(&mut self, item_no: &str) -> bool {
        self.removed_items.remove(item_no.trim())
    }

    pub fn is_removed(&self, item_no: &str) -> bool {
        self.removed_items.contains(item_no)
    }

    pub fn removed_items(&self) -> impl Iterator<Item = &str> {
        self.removed_items.iter().map(String::as_str)
    }

    // ===== 失效处理（币种切换）=====

    pub(crate) fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    pub(crate) fn selected_keys(&self) -> Vec<CombinationKey> {
        self.selected.iter().cloned().collect()
    }

    pub(crate) fn override_entries(&self) -> Vec<(CombinationKey, Vec<BaseColor>)> {
        self.combination_base_colors
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub(crate) fn family_entries(&self) -> Vec<(String, Vec<BaseColor>)> {
        self.family_base_colors
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// 彻底丢弃组合（包括选中状态、覆盖与序号）
    pub(crate) fn forget_combination(&mut self, key: &CombinationKey) {
        self.selected.remove(key);
        self.first_selected.remove(key);
        self.combination_base_colors.remove(key);
    }

    pub(crate) fn retain_removed_items<F>(&mut self, mut keep: F) -> Vec<String>
    where
        F: FnMut(&str) -> bool,
    {
        let dropped: Vec<String> = self
            .removed_items
            .iter()
            .filter(|item| !keep(item))
            .cloned()
            .collect();
        for item in &dropped {
            self.removed_items.remove(item);
        }
        dropped
    }
}

/// 新颜色列表按添加顺序排列: 已有且仍保留的颜色维持原位置,新增颜色依次追加
fn keep_insertion_order(
    previous: Option<&Vec<BaseColor>>,
    colors: &[BaseColor],
) -> Vec<BaseColor> {
    let mut ordered: Vec<BaseColor> = previous
        .into_iter()
        .flatten()
        .filter(|c| colors.contains(c))
        .cloned()
        .collect();
    for color in colors {
        if !ordered.contains(color) {
            ordered.push(color.clone());
        }
    }
    ordered
}

// ==========================================
// SelectionInvalidation - 币种切换后被丢弃的选择
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectionInvalidation {
    pub dropped_combinations: Vec<CombinationKey>,
    pub dropped_overrides: Vec<CombinationKey>,
    pub dropped_family_colors: Vec<(String, BaseColor)>,
    pub dropped_removed_items: Vec<String>,
}

impl SelectionInvalidation {
    pub fn is_empty(&self) -> bool {
        self.dropped_combinations.is_empty()
            && self.dropped_overrides.is_empty()
            && self.dropped_family_colors.is_empty()
            && self.dropped_removed_items.is_empty()
    }
}
