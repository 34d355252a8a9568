//! 标签查询服务

use crate::store::LabelStore;
use imgtag_core::{QueryResult, Result};
use std::sync::Arc;
use tracing::info;

/// 按标签检索图像记录
///
/// 每次查询对存储做一次全表扫描，适用于小规模数据集；
/// 数据量增长后需要按标签建立索引。
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn LabelStore>,
}

impl QueryService {
    pub fn new(store: Arc<dyn LabelStore>) -> Self {
        Self { store }
    }

    /// 未给定标签时返回全部记录（图库），否则返回精确包含该标签的记录。
    /// 标签区分大小写，调用方需先转为小写。
    pub async fn search(&self, tag: Option<&str>) -> Result<Vec<QueryResult>> {
        match tag {
            None => info!("No tag provided, returning full gallery"),
            Some(tag) => info!("Searching for tag: {}", tag),
        }

        let results = self.store.scan(tag).await?;
        info!("Query matched {} records", results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectLabelStore;
    use async_trait::async_trait;
    use imgtag_core::{ImageRecord, ImageRef, ImgTagError, LabelSet};

    struct FailingStore;

    #[async_trait]
    impl LabelStore for FailingStore {
        async fn put_record(&self, _record: &ImageRecord) -> Result<()> {
            Err(ImgTagError::Storage("unavailable".to_string()))
        }

        async fn scan(&self, _tag: Option<&str>) -> Result<Vec<QueryResult>> {
            Err(ImgTagError::Storage("unavailable".to_string()))
        }
    }

    async fn seeded_service() -> QueryService {
        let store = ObjectLabelStore::in_memory("imagetable");
        let items = [
            ("k8s.png", vec!["kubernetes", "helm"]),
            ("dog.png", vec!["dog", "animal"]),
            ("infra.png", vec!["kubernetes", "terraform"]),
        ];
        for (key, labels) in items {
            let labels: LabelSet = labels.into_iter().collect();
            let record = ImageRecord::build(&ImageRef::new("photos", key), "top".to_string(), labels).unwrap();
            store.put_record(&record).await.unwrap();
        }
        QueryService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_search_without_tag_returns_all() {
        let service = seeded_service().await;
        assert_eq!(service.search(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_by_tag() {
        let service = seeded_service().await;

        let mut ids: Vec<String> = service
            .search(Some("kubernetes"))
            .await
            .unwrap()
            .into_iter()
            .filter_map(|result| result.image_id)
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["infra.png", "k8s.png"]);
        assert!(service.search(Some("cat")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_error() {
        let service = QueryService::new(Arc::new(FailingStore));
        assert!(matches!(service.search(None).await, Err(ImgTagError::Storage(_))));
    }
}
