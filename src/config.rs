//! 应用配置
//!
//! 加载顺序：默认值 -> 配置目录下的 config.toml -> 环境变量。
//! 数据库 settings 表中保存的 API key 只在前面都未提供时才生效，
//! 由 `AppContext` 在连接数据库之后补上。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, CatalogResult};
use crate::remote::query::{clamp_page_size, Ordering, DEFAULT_PAGE_SIZE};

pub const DEFAULT_API_BASE_URL: &str = "https://api.rawg.io/api/";

pub const ENV_API_KEY: &str = "RAWG_API_KEY";
pub const ENV_API_BASE_URL: &str = "CATALOG_API_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";

/// 分层加载的结果，`warnings` 为被跳过的配置层
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: AppConfig,
    pub warnings: Vec<CatalogError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub default_ordering: Ordering,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 15,
            default_ordering: Ordering::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 从默认配置路径加载，并应用环境变量覆盖
    ///
    /// 各层独立降级：配置文件不可用时从默认值开始，环境变量仍然生效。
    pub fn load() -> ConfigLoad {
        let path = catalog_path::get_config_path().map_err(CatalogError::Config);
        Self::load_layered(path, |name| std::env::var(name).ok())
    }

    pub fn load_layered<F>(path: CatalogResult<PathBuf>, lookup: F) -> ConfigLoad
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut warnings = Vec::new();

        let mut config = match path.and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                warnings.push(e);
                Self::default()
            }
        };
        config.apply_overrides(lookup);

        let config = match config.clone().validated() {
            Ok(config) => config,
            Err(e) => {
                warnings.push(e);
                config.api_base_url = DEFAULT_API_BASE_URL.to_string();
                config.validated().unwrap_or_default()
            }
        };

        ConfigLoad { config, warnings }
    }

    /// 读取指定的 TOML 文件；文件不存在时返回默认配置
    pub fn load_from(path: &Path) -> CatalogResult<Self> {
        if !path.exists() {
            log::debug!("配置文件不存在，使用默认配置: {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("无法读取配置文件 {}: {}", path.display(), e)))?;
        let config = toml::from_str(&content)
            .map_err(|e| CatalogError::Config(format!("配置文件格式错误 {}: {}", path.display(), e)))?;
        log::info!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    /// 用外部变量覆盖配置项，`lookup` 通常为环境变量读取
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_blank(ENV_API_KEY) {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = non_blank(ENV_API_BASE_URL) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            self.log_level = level.trim().to_string();
        }
    }

    /// 校验并规范化配置
    pub fn validated(mut self) -> CatalogResult<Self> {
        let mut base = self.api_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let parsed = url::Url::parse(&base)
            .map_err(|e| CatalogError::Config(format!("无效的 API 地址 {}: {}", base, e)))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogError::Config(format!("API 地址必须为 http(s) 地址: {}", base)));
        }
        self.api_base_url = base;

        self.page_size = clamp_page_size(self.page_size);
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = AppConfig::default().request_timeout_secs;
        }
        self.api_key = self
            .api_key
            .take()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(self)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
