//! 基于对象存储的标签记录存储
//!
//! 每条记录是一份JSON文档，路径为 `{table}/{图像ID的URL安全base64编码}.json`。
//! 写入即覆盖，因此同一图像重复处理不会产生重复记录。

use crate::schema::decode_item;
use crate::store::LabelStore;
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bytes::Bytes;
use futures::TryStreamExt;
use imgtag_core::{ImageRecord, ImgTagError, QueryResult, Result};
use object_store::{aws::AmazonS3Builder, local::LocalFileSystem, memory::InMemory, path::Path, ObjectStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

fn storage_error(e: object_store::Error) -> ImgTagError {
    ImgTagError::Storage(e.to_string())
}

/// 对象存储上的标签记录表
#[derive(Clone)]
pub struct ObjectLabelStore {
    store: Arc<dyn ObjectStore>,
    table: String,
}

impl ObjectLabelStore {
    pub fn new(store: Arc<dyn ObjectStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// 进程内存储，用于本地运行和测试
    pub fn in_memory(table: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemory::new()), table)
    }

    /// 本地目录存储，目录不存在时创建
    pub fn local(root: impl AsRef<std::path::Path>, table: impl Into<String>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| {
            ImgTagError::Storage(format!("Failed to create store directory {}: {}", root.display(), e))
        })?;

        let fs = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| ImgTagError::Config(format!("Invalid local store directory {}: {}", root.display(), e)))?;

        Ok(Self::new(Arc::new(fs), table))
    }

    /// S3存储；凭证从环境变量读取
    pub fn s3(bucket: &str, region: &str, endpoint: Option<&str>, table: impl Into<String>) -> Result<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region);
        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }

        let s3 = builder
            .build()
            .map_err(|e| ImgTagError::Config(format!("Invalid S3 store configuration: {}", e)))?;

        Ok(Self::new(Arc::new(s3), table))
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn table_prefix(&self) -> Path {
        Path::from(self.table.as_str())
    }

    fn record_path(&self, image_id: &str) -> Path {
        let encoded = URL_SAFE_NO_PAD.encode(image_id);
        self.table_prefix().child(format!("{}.json", encoded))
    }
}

#[async_trait]
impl LabelStore for ObjectLabelStore {
    async fn put_record(&self, record: &ImageRecord) -> Result<()> {
        let path = self.record_path(record.image_id());
        let body = serde_json::to_vec(record)?;

        debug!("Putting item into table {}: {}", self.table, path);
        self.store
            .put(&path, Bytes::from(body))
            .await
            .map_err(storage_error)?;

        info!("Stored record for {} in table {}", record.image_id(), self.table);
        Ok(())
    }

    /// 全表扫描后在内存中过滤，只适合小规模数据
    async fn scan(&self, tag: Option<&str>) -> Result<Vec<QueryResult>> {
        let prefix = self.table_prefix();
        let objects: Vec<_> = self
            .store
            .list(Some(&prefix))
            .try_collect()
            .await
            .map_err(storage_error)?;

        debug!("Scanning {} objects in table {}", objects.len(), self.table);

        let mut results = Vec::with_capacity(objects.len());
        for meta in objects {
            let bytes = self
                .store
                .get(&meta.location)
                .await
                .map_err(storage_error)?
                .bytes()
                .await
                .map_err(storage_error)?;

            let value: serde_json::Value = match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Skipping unreadable record {}: {}", meta.location, e);
                    continue;
                }
            };

            match decode_item(value) {
                Ok((schema, result)) => {
                    debug!("Decoded {} as {:?} record", meta.location, schema);
                    if tag.map_or(true, |tag| result.has_label(tag)) {
                        results.push(result);
                    }
                }
                Err(e) => warn!("Skipping malformed record {}: {}", meta.location, e),
            }
        }

        Ok(results)
    }
}
