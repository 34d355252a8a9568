//! 核心数据模型定义

use crate::error::{ImgTagError, Result};
use crate::utils::image_url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 没有任何检测信号时使用的顶级标签
pub const UNKNOWN_LABEL: &str = "unknown";

/// 检测到人脸时加入标签集的合成标签
pub const PERSON_DETECTED_LABEL: &str = "person_detected";

/// 患者姓名标签前缀
pub const PATIENT_TAG_PREFIX: &str = "patient:";

/// 疾病/诊断标签前缀
pub const DISEASE_TAG_PREFIX: &str = "disease:";

/// 对象存储中的图像引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub bucket: String,
    pub key: String,
}

impl ImageRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    pub fn s3_uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

/// 单张图像的检测结果
///
/// 每次处理时由原始检测信号构建一次，之后只读。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    /// 通用标签（小写，按置信度降序）
    pub generic_labels: Vec<String>,
    /// 从通用标签中识别出的品牌
    pub brand_tags: BTreeSet<String>,
    /// 是否检测到人脸
    pub person_detected: bool,
    /// 清洗后的OCR文本片段，保留片段内空格
    pub ocr_chunks: Vec<String>,
    /// 由片段拆分出的OCR单词
    pub ocr_words: Vec<String>,
}

impl DetectionResult {
    /// 所有OCR片段以单个空格连接后的全文
    pub fn full_text(&self) -> String {
        self.ocr_chunks.join(" ")
    }
}

/// 从OCR全文中提取的结构化字段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub subject_name: Option<String>,
    pub condition: Option<String>,
}

impl ExtractedFields {
    pub fn patient_tag(&self) -> Option<String> {
        self.subject_name
            .as_ref()
            .map(|name| format!("{}{}", PATIENT_TAG_PREFIX, name))
    }

    pub fn disease_tag(&self) -> Option<String> {
        self.condition
            .as_ref()
            .map(|condition| format!("{}{}", DISEASE_TAG_PREFIX, condition))
    }
}

/// 去重并按字典序排序的标签集合
///
/// 不包含空字符串或仅由空白组成的标签。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.binary_search_by(|probe| probe.as_str().cmp(label)).is_ok()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let labels: BTreeSet<String> = iter
            .into_iter()
            .map(Into::into)
            .filter(|label| !label.trim().is_empty())
            .collect();
        Self(labels.into_iter().collect())
    }
}

impl From<Vec<String>> for LabelSet {
    fn from(labels: Vec<String>) -> Self {
        labels.into_iter().collect()
    }
}

/// 持久化的图像标签记录
///
/// 以当前字段名格式序列化：`ImageID`、`Label`、`Labels`、`ImageUrl`、`ObjectKey`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "ImageID")]
    image_id: String,
    #[serde(rename = "Label")]
    top_label: String,
    #[serde(rename = "Labels")]
    labels: LabelSet,
    #[serde(rename = "ImageUrl")]
    image_url: String,
    #[serde(rename = "ObjectKey")]
    object_key: String,
}

impl ImageRecord {
    /// 组装记录，图像地址由桶名与对象键推导
    pub fn build(image: &ImageRef, top_label: String, labels: LabelSet) -> Result<Self> {
        if image.key.is_empty() {
            return Err(ImgTagError::Validation("image id is required".to_string()));
        }
        if image.bucket.is_empty() {
            return Err(ImgTagError::Validation("bucket is required".to_string()));
        }
        if top_label.trim().is_empty() {
            return Err(ImgTagError::Validation("top label must not be empty".to_string()));
        }

        Ok(Self {
            image_id: image.key.clone(),
            top_label,
            labels,
            image_url: image_url(&image.bucket, &image.key),
            object_key: image.key.clone(),
        })
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn top_label(&self) -> &str {
        &self.top_label
    }

    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn object_key(&self) -> &str {
        &self.object_key
    }
}

/// 查询结果，与存储记录的字段名版本无关
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub image_id: Option<String>,
    pub labels: Vec<String>,
    pub image_url: String,
    pub object_key: Option<String>,
}

impl QueryResult {
    pub fn has_label(&self, tag: &str) -> bool {
        self.labels.iter().any(|label| label == tag)
    }
}

/// 对象存储的对象创建事件
#[derive(Debug, Clone, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct S3Object {
    pub key: String,
}

impl StorageEvent {
    /// 取事件中的第一个对象；其余记录不处理
    pub fn first_image(&self) -> Result<ImageRef> {
        let record = self
            .records
            .first()
            .ok_or_else(|| ImgTagError::Event("event contains no records".to_string()))?;

        Ok(ImageRef::new(
            record.s3.bucket.name.clone(),
            record.s3.object.key.clone(),
        ))
    }
}

/// 摄取处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOutcome {
    pub status_code: u16,
    pub message: String,
}

impl IngestionOutcome {
    pub const SUCCESS_MESSAGE: &'static str = "Success: Universal image metadata stored.";

    pub fn success() -> Self {
        Self {
            status_code: 200,
            message: Self::SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure(error: &ImgTagError) -> Self {
        Self {
            status_code: 500,
            message: format!("Error: {}", error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
