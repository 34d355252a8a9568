//! 图像标注流水线
//!
//! 检测 → 清洗/分类 → 字段提取 → 规范化 → 组装记录。
//! 流水线本身不持有可变状态，可被多个并发调用共享。

use crate::client::{DetectionClient, LabelOptions};
use crate::extractor::extract_fields;
use crate::keywords::brands_in;
use crate::normalizer::{build_label_set, resolve_top_label, tech_tools};
use crate::ocr::OcrText;
use imgtag_core::{DetectionResult, ImageRecord, ImageRef, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 图像标注流水线
#[derive(Clone)]
pub struct LabelingPipeline {
    client: Arc<dyn DetectionClient>,
    options: LabelOptions,
}

impl LabelingPipeline {
    pub fn new(client: Arc<dyn DetectionClient>, options: LabelOptions) -> Self {
        Self { client, options }
    }

    /// 调用三项检测并构建检测结果；单项失败时该信号视为缺失
    pub async fn detect(&self, image: &ImageRef) -> DetectionResult {
        let (labels, faces, text) = tokio::join!(
            self.client.detect_labels(image, self.options),
            self.client.detect_faces(image),
            self.client.detect_text(image),
        );

        let generic_labels: Vec<String> = match labels {
            Ok(labels) => labels
                .into_iter()
                .map(|label| label.name.to_lowercase())
                .filter(|name| !name.trim().is_empty())
                .collect(),
            Err(e) => {
                warn!("detect_labels failed for {}: {}", image.s3_uri(), e);
                Vec::new()
            }
        };

        let brand_tags: BTreeSet<String> = generic_labels
            .iter()
            .flat_map(|label| brands_in(label))
            .collect();

        info!("General labels: {:?}", generic_labels);
        info!("Brand tags from labels: {:?}", brand_tags);

        let person_detected = match faces {
            Ok(faces) if !faces.is_empty() => {
                info!("Faces detected: {}", faces.len());
                true
            }
            Ok(_) => false,
            Err(e) => {
                warn!("detect_faces failed for {}: {}", image.s3_uri(), e);
                false
            }
        };

        let ocr = match text {
            Ok(detections) => OcrText::from_detections(&detections),
            Err(e) => {
                warn!("detect_text failed for {}: {}", image.s3_uri(), e);
                OcrText::default()
            }
        };

        debug!("OCR chunks: {:?}", ocr.chunks);
        debug!("OCR words: {:?}", ocr.words);

        DetectionResult {
            generic_labels,
            brand_tags,
            person_detected,
            ocr_chunks: ocr.chunks,
            ocr_words: ocr.words,
        }
    }

    /// 完整处理一张图像，得到待持久化的记录
    pub async fn label(&self, image: &ImageRef) -> Result<ImageRecord> {
        info!("Processing object: {}", image.s3_uri());

        let detection = self.detect(image).await;

        let full_text = detection.full_text();
        debug!("Full OCR text: {}", full_text);

        let fields = extract_fields(&full_text);
        info!(
            "Extracted patient_name: {:?}, disease: {:?}",
            fields.subject_name, fields.condition
        );
        info!("Detected tech tools: {:?}", tech_tools(&detection));

        let labels = build_label_set(&detection, &fields);
        if labels.is_empty() {
            warn!("No labels detected for {}", image.s3_uri());
        }
        let top_label = resolve_top_label(&detection, &fields);
        info!("Final labels: {:?}", labels.as_slice());
        info!("Selected top label: {}", top_label);

        ImageRecord::build(image, top_label, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{DetectedFace, DetectedLabel, StaticDetectionClient, TextDetection};

    fn pipeline(client: StaticDetectionClient) -> LabelingPipeline {
        LabelingPipeline::new(Arc::new(client), LabelOptions::default())
    }

    fn image() -> ImageRef {
        ImageRef::new("uploads", "scan.png")
    }

    #[tokio::test]
    async fn test_medical_document() {
        let client = StaticDetectionClient::empty().with_text(Some(vec![
            TextDetection::line("Patient: Jane Doe."),
            TextDetection::line("Diagnosis: Flu"),
        ]));

        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "disease:flu");
        assert!(record.labels().contains("patient:jane doe"));
        assert!(record.labels().contains("disease:flu"));
        assert!(record.labels().contains("diagnosis"));
    }

    #[tokio::test]
    async fn test_generic_labels_lowercased() {
        let client = StaticDetectionClient::empty().with_labels(Some(vec![
            DetectedLabel::new("Dog", 99.0),
            DetectedLabel::new("Animal", 97.0),
        ]));

        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "dog");
        assert_eq!(record.labels().as_slice(), &["animal", "dog"]);
    }

    #[tokio::test]
    async fn test_blank_label_does_not_block_record() {
        let client = StaticDetectionClient::empty().with_labels(Some(vec![
            DetectedLabel::new("  ", 99.0),
            DetectedLabel::new("Dog", 98.0),
        ]));

        let detection = pipeline(client.clone()).detect(&image()).await;
        assert_eq!(detection.generic_labels, vec!["dog"]);

        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "dog");
        assert_eq!(record.labels().as_slice(), &["dog"]);
    }

    #[tokio::test]
    async fn test_spaced_subject_name_is_preserved() {
        let client = StaticDetectionClient::empty().with_text(Some(vec![
            TextDetection::word("Name"),
            TextDetection::word("Jane"),
            TextDetection::word("#  #"),
            TextDetection::word("Doe."),
        ]));

        let record = pipeline(client).label(&image()).await.unwrap();
        assert!(record.labels().contains("patient:jane    doe"));
        assert!(!record.labels().contains("patient:jane doe"));
    }

    #[tokio::test]
    async fn test_brand_detection_from_labels() {
        let client = StaticDetectionClient::empty().with_labels(Some(vec![
            DetectedLabel::new("Nike Logo", 92.0),
            DetectedLabel::new("Shoe", 90.0),
        ]));

        let detection = pipeline(client).detect(&image()).await;
        assert!(detection.brand_tags.contains("nike"));

        let client = StaticDetectionClient::empty().with_labels(Some(vec![
            DetectedLabel::new("Nike Logo", 92.0),
        ]));
        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "nike");
    }

    #[tokio::test]
    async fn test_failed_signals_are_absent() {
        let client = StaticDetectionClient::empty()
            .with_labels(None)
            .with_faces(None)
            .with_text(Some(vec![TextDetection::word("Kubernetes")]));

        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "kubernetes");
        assert_eq!(record.labels().as_slice(), &["kubernetes"]);
    }

    #[tokio::test]
    async fn test_all_signals_failed() {
        let client = StaticDetectionClient::default();

        let record = pipeline(client).label(&image()).await.unwrap();
        assert_eq!(record.top_label(), "unknown");
        assert!(record.labels().is_empty());
        assert_eq!(record.image_url(), "https://uploads.s3.amazonaws.com/scan.png");
    }

    #[tokio::test]
    async fn test_faces_add_person_marker() {
        let client = StaticDetectionClient::empty()
            .with_faces(Some(vec![DetectedFace::default(), DetectedFace::default()]));

        let record = pipeline(client).label(&image()).await.unwrap();
        assert!(record.labels().contains("person_detected"));
        assert_eq!(record.top_label(), "unknown");
    }

    #[tokio::test]
    async fn test_labeling_is_deterministic() {
        let client = StaticDetectionClient::empty()
            .with_labels(Some(vec![DetectedLabel::new("Amazon Web Services", 88.0)]))
            .with_text(Some(vec![TextDetection::line("AWS EKS with Helm")]));
        let pipeline = pipeline(client);

        let first = pipeline.label(&image()).await.unwrap();
        let second = pipeline.label(&image()).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.top_label(), "amazon");
    }
}
