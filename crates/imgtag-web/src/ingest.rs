//! 图像事件摄取
//!
//! 一次调用处理一个对象创建事件：标注图像并写入一条完整记录。
//! 任何失败都转换为失败结果返回，不会越过调用边界。

use imgtag_core::{ImgTagError, IngestionOutcome, Result, StorageEvent};
use imgtag_storage::LabelStore;
use imgtag_vision::LabelingPipeline;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 图像事件摄取器
#[derive(Clone)]
pub struct Ingestor {
    pipeline: LabelingPipeline,
    store: Arc<dyn LabelStore>,
}

impl Ingestor {
    pub fn new(pipeline: LabelingPipeline, store: Arc<dyn LabelStore>) -> Self {
        Self { pipeline, store }
    }

    /// 处理原始事件负载
    pub async fn handle_payload(&self, payload: &[u8]) -> IngestionOutcome {
        debug!("Received event: {}", String::from_utf8_lossy(payload));

        match serde_json::from_slice::<StorageEvent>(payload) {
            Ok(event) => self.handle_event(&event).await,
            Err(e) => {
                let e = ImgTagError::Event(e.to_string());
                error!("Ingestion failed: {}", e);
                IngestionOutcome::failure(&e)
            }
        }
    }

    /// 处理已解析的事件
    pub async fn handle_event(&self, event: &StorageEvent) -> IngestionOutcome {
        match self.process(event).await {
            Ok(()) => IngestionOutcome::success(),
            Err(e) => {
                error!("Ingestion failed: {}", e);
                IngestionOutcome::failure(&e)
            }
        }
    }

    async fn process(&self, event: &StorageEvent) -> Result<()> {
        let image = event.first_image()?;
        let record = self.pipeline.label(&image).await?;

        self.store.put_record(&record).await?;
        info!("Labeled {} with top label {}", record.image_id(), record.top_label());
        Ok(())
    }
}
