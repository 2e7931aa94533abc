// ==========================================
// M2O 主数据配置系统 - 流水线问题记录
// ==========================================
// 红线: 每条问题必须可归因到具体组合或单品
// 分类: 完整性错误 / 选择不完整 / 查价缺失
// ==========================================

use crate::domain::catalog::{BaseColor, PriceLookup};
use crate::domain::combination::CombinationKey;
use crate::domain::types::{Currency, PriceKind};
use serde::Serialize;

// ==========================================
// IssueLevel - 问题级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueLevel {
    Error,   // 该单品未导出
    Warning, // 已导出,但数据不完整
}

// ==========================================
// IssueKind - 问题类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    IncompleteSelection, // 需要消歧但未选择底座颜色
    MissingRow,          // 组合 + 底座颜色在目录中找不到对应行
    AmbiguousRow,        // 组合 + 底座颜色匹配到多行
    PriceMissing,        // 价格表中查不到价格
}

// ==========================================
// PipelineIssue - 单条问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineIssue {
    pub level: IssueLevel,
    pub kind: IssueKind,
    pub combination: Option<CombinationKey>,
    pub base_color: Option<BaseColor>,
    pub item_no: Option<String>,
    pub article_no: Option<String>,
    pub price_kind: Option<PriceKind>,
    pub message: String,
}

impl PipelineIssue {
    pub fn incomplete_selection(key: &CombinationKey) -> Self {
        Self {
            level: IssueLevel::Error,
            kind: IssueKind::IncompleteSelection,
            combination: Some(key.clone()),
            base_color: None,
            item_no: None,
            article_no: None,
            price_kind: None,
            message: format!("组合需要选择底座颜色后才能导出: {}", key),
        }
    }

    pub fn missing_row(key: &CombinationKey, base_color: &BaseColor) -> Self {
        Self {
            level: IssueLevel::Error,
            kind: IssueKind::MissingRow,
            combination: Some(key.clone()),
            base_color: Some(base_color.clone()),
            item_no: None,
            article_no: None,
            price_kind: None,
            message: format!(
                "目录中不存在匹配行: {} + 底座颜色 {}",
                key, base_color
            ),
        }
    }

    pub fn combination_not_found(key: &CombinationKey) -> Self {
        Self {
            level: IssueLevel::Error,
            kind: IssueKind::MissingRow,
            combination: Some(key.clone()),
            base_color: None,
            item_no: None,
            article_no: None,
            price_kind: None,
            message: format!("已选组合在当前目录中不存在: {}", key),
        }
    }

    pub fn ambiguous_row(key: &CombinationKey, base_color: &BaseColor, item_nos: &[&str]) -> Self {
        Self {
            level: IssueLevel::Warning,
            kind: IssueKind::AmbiguousRow,
            combination: Some(key.clone()),
            base_color: Some(base_color.clone()),
            item_no: item_nos.first().map(|s| s.to_string()),
            article_no: None,
            price_kind: None,
            message: format!(
                "组合 + 底座颜色匹配到多行 ({}),使用首行: {} + {}",
                item_nos.join(", "),
                key,
                base_color
            ),
        }
    }

    pub fn price_missing(
        item_no: &str,
        article_no: Option<&str>,
        kind: PriceKind,
        currency: Currency,
        lookup: PriceLookup,
    ) -> Self {
        let reason = match (article_no, lookup) {
            (None, _) => "目录行缺少货号".to_string(),
            (Some(article), PriceLookup::MissingArticle) => {
                format!("货号 {} 不在{}价格表中", article, price_kind_label(kind))
            }
            (Some(article), PriceLookup::BlankCell) => {
                format!("货号 {} 的 {} 价格为空", article, currency)
            }
            (Some(_), PriceLookup::MissingColumn) => {
                format!("{}价格表缺少 {} 列", price_kind_label(kind), currency)
            }
            (Some(_), PriceLookup::Found(_)) => "价格存在".to_string(),
        };

        Self {
            level: IssueLevel::Warning,
            kind: IssueKind::PriceMissing,
            combination: None,
            base_color: None,
            item_no: Some(item_no.to_string()),
            article_no: article_no.map(str::to_string),
            price_kind: Some(kind),
            message: format!("单品 {} 查价失败: {}", item_no, reason),
        }
    }
}

fn price_kind_label(kind: PriceKind) -> &'static str {
    match kind {
        PriceKind::Wholesale => "批发",
        PriceKind::Retail => "零售",
    }
}

// ==========================================
// PipelineReport - 导出报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    pub summary: ReportSummary,
    pub issues: Vec<PipelineIssue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub selected_combinations: usize,
    pub exported_items: usize,
    pub removed_items: usize,
    pub incomplete_selections: usize,
    pub integrity_errors: usize,
    pub price_warnings: usize,
}

impl PipelineReport {
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.level == IssueLevel::Error)
    }

    /// 按问题列表刷新汇总中的问题计数
    pub fn refresh_issue_counts(&mut self) {
        self.summary.incomplete_selections = self.count(IssueKind::IncompleteSelection);
        self.summary.integrity_errors = self.count(IssueKind::MissingRow);
        self.summary.price_warnings = self.count(IssueKind::PriceMissing);
    }
}
