// ==========================================
// M2O 主数据配置系统 - 引擎错误类型
// ==========================================
// 配置错误: 处理开始前即失败,不产生任何输出
// 选择输入错误: 拒绝本次操作,选择状态不变
// 逐单品问题不是错误,以 PipelineIssue 形式累积
// ==========================================

use crate::domain::catalog::BaseColor;
use crate::domain::combination::CombinationKey;
use crate::domain::types::{Currency, PriceKind, Region};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    // ===== 配置错误 =====
    #[error("未识别的币种: '{0}'")]
    UnknownCurrency(String),

    #[error("模板列无法识别: '{0}'")]
    UnknownTemplateColumn(String),

    #[error("价格表缺少 {currency} 列 ({kind})")]
    PriceColumnMissing { currency: Currency, kind: PriceKind },

    #[error("{currency} 属于 {} 区域,不能使用 {region} 区域的价格表", .currency.region())]
    PriceRegionMismatch { currency: Currency, region: Region },

    #[error("组合索引已过期: 索引币种 {index}, 选择币种 {selection}")]
    StaleCombinationIndex { index: Currency, selection: Currency },

    // ===== 选择输入错误 =====
    #[error("当前币种下不存在该组合: {0}")]
    UnknownCombination(CombinationKey),

    #[error("当前币种下不存在产品家族: '{0}'")]
    UnknownFamily(String),

    #[error("底座颜色 {color} 不是组合 {combination} 的候选颜色")]
    InvalidBaseColor {
        combination: CombinationKey,
        color: BaseColor,
    },

    #[error("底座颜色 {color} 不在产品家族 '{family}' 的任何候选颜色中")]
    InvalidFamilyBaseColor { family: String, color: BaseColor },

    #[error("组合只有一个候选底座颜色,无需选择: {0}")]
    DisambiguationNotRequired(CombinationKey),

    #[error("产品家族 '{0}' 下没有需要选择底座颜色的组合")]
    NoDisambiguationInFamily(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
