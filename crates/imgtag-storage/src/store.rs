//! 记录存储接口

use async_trait::async_trait;
use imgtag_core::{ImageRecord, QueryResult, Result};

/// 以图像ID为主键的标签记录存储
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// 写入记录，已存在相同图像ID的记录时覆盖
    async fn put_record(&self, record: &ImageRecord) -> Result<()>;

    /// 扫描全部记录；给定标签时只返回标签集合中精确包含该标签的记录
    async fn scan(&self, tag: Option<&str>) -> Result<Vec<QueryResult>>;
}
