//! 服务配置
//!
//! 配置来源按优先级从低到高：配置文件、`IMGTAG` 前缀环境变量、`TABLE_NAME` / `table_name` 环境变量。

use config::{Config, Environment, File};
use imgtag_core::{ImgTagError, Result};
use imgtag_storage::ObjectLabelStore;
use imgtag_vision::{HttpDetectionConfig, LabelOptions};
use serde::Deserialize;

/// 未配置任何表名时查询端使用的表
pub const DEFAULT_QUERY_TABLE: &str = "imagetable";

/// 完整配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub detection: DetectionSettings,
}

/// 监听地址配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// 本地目录
    #[default]
    Local,
    /// 进程内存，进程退出后记录丢失
    Memory,
    S3,
}

/// 记录存储配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// 记录表名
    pub table_name: Option<String>,
    /// 早期部署使用的表名
    pub legacy_table_name: Option<String>,
    pub backend: StoreBackend,
    /// `local` 后端的根目录
    pub root: String,
    pub bucket: Option<String>,
    pub region: String,
    pub endpoint: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            table_name: None,
            legacy_table_name: None,
            backend: StoreBackend::default(),
            root: "data".to_string(),
            bucket: None,
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StoreSettings {
    /// 摄取端必须显式配置表名
    pub fn ingest_table(&self) -> Result<&str> {
        non_empty(&self.table_name)
            .ok_or_else(|| ImgTagError::Config("TABLE_NAME environment variable is not set".to_string()))
    }

    /// 查询端依次回退到早期表名和默认表名
    pub fn query_table(&self) -> &str {
        non_empty(&self.table_name)
            .or_else(|| non_empty(&self.legacy_table_name))
            .unwrap_or(DEFAULT_QUERY_TABLE)
    }

    /// 单次运行的命令需要进程退出后仍然存在的后端
    pub fn require_persistent(&self) -> Result<()> {
        match self.backend {
            StoreBackend::Memory => Err(ImgTagError::Config(
                "store.backend = \"memory\" does not persist records; use \"local\" or \"s3\"".to_string(),
            )),
            StoreBackend::Local | StoreBackend::S3 => Ok(()),
        }
    }

    pub fn open(&self, table: &str) -> Result<ObjectLabelStore> {
        match self.backend {
            StoreBackend::Local => ObjectLabelStore::local(&self.root, table),
            StoreBackend::Memory => Ok(ObjectLabelStore::in_memory(table)),
            StoreBackend::S3 => {
                let bucket = non_empty(&self.bucket)
                    .ok_or_else(|| ImgTagError::Config("store.bucket is required for the s3 backend".to_string()))?;
                ObjectLabelStore::s3(bucket, &self.region, self.endpoint.as_deref(), table)
            }
        }
    }
}

/// 检测服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    pub endpoint: String,
    pub max_labels: u32,
    pub min_confidence: f32,
    pub timeout_secs: u64,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        let http = HttpDetectionConfig::default();
        let options = LabelOptions::default();
        Self {
            endpoint: http.endpoint,
            max_labels: options.max_labels,
            min_confidence: options.min_confidence,
            timeout_secs: http.timeout_secs,
        }
    }
}

impl DetectionSettings {
    pub fn http_config(&self) -> HttpDetectionConfig {
        HttpDetectionConfig {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn label_options(&self) -> LabelOptions {
        LabelOptions {
            max_labels: self.max_labels,
            min_confidence: self.min_confidence,
        }
    }
}

impl Settings {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let builder = builder
            .add_source(Environment::with_prefix("IMGTAG").separator("__"))
            .set_override_option("store.table_name", std::env::var("TABLE_NAME").ok())
            .and_then(|b| b.set_override_option("store.legacy_table_name", std::env::var("table_name").ok()))
            .map_err(|e| ImgTagError::Config(e.to_string()))?;

        Self::from_config(builder.build().map_err(|e| ImgTagError::Config(e.to_string()))?)
    }

    fn from_config(config: Config) -> Result<Self> {
        config
            .try_deserialize()
            .map_err(|e| ImgTagError::Config(format!("Failed to deserialize configuration: {}", e)))
    }
}
