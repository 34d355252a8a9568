//! 检测服务客户端接口

use async_trait::async_trait;
use imgtag_core::{ImageRef, ImgTagError, Result};
use serde::{Deserialize, Serialize};

/// 通用标签检测参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelOptions {
    /// 最多返回的标签数
    pub max_labels: u32,
    /// 最低置信度（0-100）
    pub min_confidence: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_labels: 25,
            min_confidence: 70.0,
        }
    }
}

/// 检测到的通用标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedLabel {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub confidence: f32,
}

impl DetectedLabel {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// 检测到的人脸
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectedFace {
    #[serde(default)]
    pub confidence: f32,
}

/// OCR文本粒度
///
/// 缺失或无法识别的类型记为 `Other`，该片段随后被忽略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TextGranularity {
    Word,
    Line,
    #[default]
    #[serde(other)]
    Other,
}

/// 检测到的OCR文本片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDetection {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub granularity: TextGranularity,
}

impl TextDetection {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            granularity: TextGranularity::Word,
        }
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            granularity: TextGranularity::Line,
        }
    }
}

/// 检测服务客户端
///
/// 三个调用彼此独立，任一调用失败不影响其余调用。
#[async_trait]
pub trait DetectionClient: Send + Sync {
    /// 通用标签检测，结果按置信度降序
    async fn detect_labels(&self, image: &ImageRef, options: LabelOptions) -> Result<Vec<DetectedLabel>>;

    /// 人脸检测
    async fn detect_faces(&self, image: &ImageRef) -> Result<Vec<DetectedFace>>;

    /// 文本检测
    async fn detect_text(&self, image: &ImageRef) -> Result<Vec<TextDetection>>;
}

/// 返回预设结果的检测客户端，`None` 表示对应调用失败
#[derive(Debug, Clone, Default)]
pub struct StaticDetectionClient {
    labels: Option<Vec<DetectedLabel>>,
    faces: Option<Vec<DetectedFace>>,
    text: Option<Vec<TextDetection>>,
}

impl StaticDetectionClient {
    /// 三个调用均成功且无结果
    pub fn empty() -> Self {
        Self {
            labels: Some(Vec::new()),
            faces: Some(Vec::new()),
            text: Some(Vec::new()),
        }
    }

    pub fn with_labels(mut self, labels: Option<Vec<DetectedLabel>>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_faces(mut self, faces: Option<Vec<DetectedFace>>) -> Self {
        self.faces = faces;
        self
    }

    pub fn with_text(mut self, text: Option<Vec<TextDetection>>) -> Self {
        self.text = text;
        self
    }
}

#[async_trait]
impl DetectionClient for StaticDetectionClient {
    async fn detect_labels(&self, _image: &ImageRef, options: LabelOptions) -> Result<Vec<DetectedLabel>> {
        let labels = self
            .labels
            .clone()
            .ok_or_else(|| ImgTagError::Detection("label detection unavailable".to_string()))?;

        Ok(labels
            .into_iter()
            .filter(|label| label.confidence >= options.min_confidence)
            .take(options.max_labels as usize)
            .collect())
    }

    async fn detect_faces(&self, _image: &ImageRef) -> Result<Vec<DetectedFace>> {
        self.faces
            .clone()
            .ok_or_else(|| ImgTagError::Detection("face detection unavailable".to_string()))
    }

    async fn detect_text(&self, _image: &ImageRef) -> Result<Vec<TextDetection>> {
        self.text
            .clone()
            .ok_or_else(|| ImgTagError::Detection("text detection unavailable".to_string()))
    }
}
