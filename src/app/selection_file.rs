// ==========================================
// M2O 主数据配置系统 - 选择文件
// ==========================================
// 用途: 批量导出时以 JSON 文件重放完整的用户选择
// 重放顺序: 币种 → 组合 → 家族级底座颜色 → 单组合底座颜色 → 单品移除
// ==========================================

use crate::app::session::ConfiguratorSession;
use crate::config::ConfigError;
use crate::domain::catalog::BaseColor;
use crate::domain::combination::CombinationKey;
use crate::domain::types::Currency;
use crate::engine::{parse_currency, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

// ==========================================
// SelectionEntry - 单个组合选择
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEntry {
    #[serde(flatten)]
    pub combination: CombinationKey,

    /// 单组合底座颜色覆盖（缺省 = 使用家族级默认或隐式颜色；null / "" = 无底座颜色）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_colors: Option<Vec<Option<String>>>,
}

// ==========================================
// SelectionFile - 选择文件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionFile {
    /// 币种标签（缺省使用配置中的默认币种）
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub selections: Vec<SelectionEntry>,

    #[serde(default)]
    pub family_base_colors: BTreeMap<String, Vec<Option<String>>>,

    #[serde(default)]
    pub removed_items: Vec<String>,
}

impl SelectionFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 解析文件中的币种；未指定时返回 None
    pub fn currency(&self) -> EngineResult<Option<Currency>> {
        self.currency.as_deref().map(parse_currency).transpose()
    }

    /// 将选择重放到会话中（任一条目无效即返回错误）
    pub fn apply(&self, session: &mut ConfiguratorSession) -> EngineResult<()> {
        if let Some(currency) = self.currency()? {
            if currency != session.currency() {
                session.change_currency(currency);
            }
        }

        for entry in &self.selections {
            session.select(&entry.combination)?;
        }

        for (family, colors) in &self.family_base_colors {
            session.set_family_base_colors(family, &to_base_colors(colors))?;
        }

        for entry in &self.selections {
            if let Some(colors) = &entry.base_colors {
                session.set_combination_base_colors(&entry.combination, &to_base_colors(colors))?;
            }
        }

        for item_no in &self.removed_items {
            session.remove_item(item_no);
        }

        info!(
            currency = %session.currency(),
            selections = self.selections.len(),
            removed_items = self.removed_items.len(),
            "选择文件已重放"
        );
        Ok(())
    }
}

fn to_base_colors(colors: &[Option<String>]) -> Vec<BaseColor> {
    colors.iter().cloned().map(BaseColor::from).collect()
}
