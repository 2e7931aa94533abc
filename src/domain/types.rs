// ==========================================
// M2O 主数据配置系统 - 领域类型定义
// ==========================================
// 职责: 币种 / 区域 / 市场 / 价格类型等封闭枚举
// 红线: 币种为封闭集合,未知币种必须报错,不得默认到任何区域
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 价格区域 (Region)
// ==========================================
// 每个区域对应一张价格表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    Eu,   // 欧盟区域
    UkIe, // 英国/爱尔兰区域
}

impl Region {
    /// 本区域需要排除的市场标记
    pub fn excluded_market(&self) -> Market {
        match self {
            Region::Eu => Market::Uk,
            Region::UkIe => Market::Eu,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Eu => write!(f, "EU"),
            Region::UkIe => write!(f, "UK/IE"),
        }
    }
}

// ==========================================
// 币种 (Currency)
// ==========================================
// 序列化格式: 与价格表列名一致的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "DKK")]
    Dkk,
    #[serde(rename = "SEK")]
    Sek,
    #[serde(rename = "NOK")]
    Nok,
    #[serde(rename = "CHF")]
    Chf,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "IE - EUR")]
    IeEur,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Eur,
        Currency::Dkk,
        Currency::Sek,
        Currency::Nok,
        Currency::Chf,
        Currency::Gbp,
        Currency::IeEur,
    ];

    /// 币种所属价格区域
    pub fn region(&self) -> Region {
        match self {
            Currency::Eur | Currency::Dkk | Currency::Sek | Currency::Nok | Currency::Chf => {
                Region::Eu
            }
            Currency::Gbp | Currency::IeEur => Region::UkIe,
        }
    }

    /// 价格表列名 / 导出列名中使用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Dkk => "DKK",
            Currency::Sek => "SEK",
            Currency::Nok => "NOK",
            Currency::Chf => "CHF",
            Currency::Gbp => "GBP",
            Currency::IeEur => "IE - EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 未识别的币种
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCurrency(pub String);

impl fmt::Display for UnknownCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "未识别的币种: '{}'", self.0)
    }
}

impl std::error::Error for UnknownCurrency {}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    /// 解析币种标签（忽略大小写与空白/连字符差异）
    ///
    /// # 示例
    /// - "EUR" / "euro" → Eur
    /// - "IE - EUR" / "IE-EUR" / "ie eur" → IeEur
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        match compact.as_str() {
            "EUR" | "EURO" => Ok(Currency::Eur),
            "DKK" => Ok(Currency::Dkk),
            "SEK" => Ok(Currency::Sek),
            "NOK" => Ok(Currency::Nok),
            "CHF" => Ok(Currency::Chf),
            "GBP" => Ok(Currency::Gbp),
            "IEEUR" | "IEEURO" => Ok(Currency::IeEur),
            _ => Err(UnknownCurrency(s.trim().to_string())),
        }
    }
}

// ==========================================
// 市场标记 (Market)
// ==========================================
// EU / UK 之外的任何取值（含空）均视为不受限
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    Eu,
    Uk,
    Other(String),
}

impl Market {
    /// 从原始单元格值解析（TRIM + 忽略大小写）
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("EU") {
            Market::Eu
        } else if trimmed.eq_ignore_ascii_case("UK") {
            Market::Uk
        } else {
            Market::Other(trimmed.to_string())
        }
    }

    /// 在指定区域下是否可见
    pub fn is_visible_in(&self, region: Region) -> bool {
        *self != region.excluded_market()
    }
}

impl Default for Market {
    fn default() -> Self {
        Market::Other(String::new())
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Eu => write!(f, "EU"),
            Market::Uk => write!(f, "UK"),
            Market::Other(raw) => f.write_str(raw),
        }
    }
}

// ==========================================
// 价格类型 (Price Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceKind {
    Wholesale, // 批发价
    Retail,    // 零售价
}

impl fmt::Display for PriceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceKind::Wholesale => write!(f, "WHOLESALE"),
            PriceKind::Retail => write!(f, "RETAIL"),
        }
    }
}
