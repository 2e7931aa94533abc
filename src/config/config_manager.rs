// ==========================================
// M2O 主数据配置系统 - 配置管理器
// ==========================================
// 职责: 配置定位、加载、校验、保存
// 定位顺序: M2O_CONFIG_PATH → 用户配置目录 → ./m2o_config.json
// ==========================================

use crate::config::app_config::AppConfig;
use crate::domain::types::Currency;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "M2O_CONFIG_PATH";

/// 本地回退配置文件名
pub const LOCAL_CONFIG_FILE: &str = "m2o_config.json";

/// 配置模块错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },

    #[error("配置文件写入失败 ({path}): {message}")]
    WriteError { path: String, message: String },

    #[error("配置值无效 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 使用内存中的配置（测试 / 嵌入场景）
    pub fn from_config(config: AppConfig) -> ConfigResult<Self> {
        Self::validate(&config)?;
        Ok(Self {
            config,
            source_path: None,
        })
    }

    /// 从指定文件加载配置,相对路径按文件所在目录解析
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

        let mut config: AppConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path_str.clone(),
                message: e.to_string(),
            })?;

        if let Some(base_dir) = path.parent() {
            config.resolve_paths(base_dir);
        }

        Self::validate(&config)?;
        info!(config_path = %path_str, "配置加载完成");

        Ok(Self {
            config,
            source_path: Some(path.to_path_buf()),
        })
    }

    /// 按默认定位顺序加载；配置文件不存在时使用默认配置
    pub fn load_default() -> ConfigResult<Self> {
        let path = Self::locate_config_path();
        if path.exists() {
            Self::load_from_path(path)
        } else {
            debug!(config_path = %path.display(), "未找到配置文件,使用默认配置");
            Self::from_config(AppConfig::default())
        }
    }

    /// 定位配置文件
    pub fn locate_config_path() -> PathBuf {
        // 允许通过环境变量显式指定配置路径（便于调试/测试/CI）
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let candidate = config_dir.join("m2o-masterdata").join("config.json");
            if candidate.exists() {
                return candidate;
            }
        }

        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// 保存配置到文件（JSON,带缩进）
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let json = serde_json::to_string_pretty(&self.config).map_err(|e| {
            ConfigError::WriteError {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        fs::write(path, json).map_err(|e| ConfigError::WriteError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// 校验配置
    ///
    /// # 规则
    /// - default_currency 若存在必须是已知币种
    /// - 价格列名不得为空
    /// - 价格列覆写的键必须是已知币种
    pub fn validate(config: &AppConfig) -> ConfigResult<()> {
        if let Some(raw) = config.default_currency.as_deref() {
            raw.parse::<Currency>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "default_currency".to_string(),
                    value: raw.to_string(),
                    message: e.to_string(),
                })?;
        }

        for (key, value) in [
            ("columns.wholesale_price_column", &config.columns.wholesale_price_column),
            ("columns.retail_price_column", &config.columns.retail_price_column),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    message: "列名不能为空".to_string(),
                });
            }
        }

        for label in config.columns.price_column_overrides.keys() {
            label.parse::<Currency>().map_err(|e| ConfigError::InvalidValue {
                key: "columns.price_column_overrides".to_string(),
                value: label.clone(),
                message: e.to_string(),
            })?;
        }

        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// 缺省币种（已在加载时校验）
    pub fn default_currency(&self) -> Option<Currency> {
        self.config
            .default_currency
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }

    /// 价格表中某币种对应的列名
    pub fn price_column_for(&self, currency: Currency) -> String {
        price_column_for(&self.config, currency)
    }
}

/// 价格表中某币种对应的列名（覆写优先,否则为币种标签）
pub fn price_column_for(config: &AppConfig, currency: Currency) -> String {
    config
        .columns
        .price_column_overrides
        .iter()
        .find(|(label, _)| label.parse::<Currency>().ok() == Some(currency))
        .map(|(_, column)| column.clone())
        .unwrap_or_else(|| currency.label().to_string())
}
