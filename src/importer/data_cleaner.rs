// ==========================================
// M2O 主数据配置系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 价格数值解析
// ==========================================

use crate::importer::importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

// 视为空值的占位文本（忽略大小写）
const NULL_MARKERS: [&str; 4] = ["nan", "none", "null", "n/a"];

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = self.clean_text(&v);
            if trimmed.is_empty()
                || NULL_MARKERS
                    .iter()
                    .any(|marker| trimmed.eq_ignore_ascii_case(marker))
            {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    fn parse_price(&self, value: Option<&str>) -> Result<Option<f64>, String> {
        let Some(raw) = self.normalize_null(value.map(str::to_string)) else {
            return Ok(None);
        };

        match raw.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(format!("价格不是有效数值: '{}'", raw)),
        }
    }
}
