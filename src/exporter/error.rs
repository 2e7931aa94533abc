// ==========================================
// M2O 主数据配置系统 - 导出模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("CSV 写入失败: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
