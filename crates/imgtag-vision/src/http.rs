//! 基于HTTP的检测服务客户端

use crate::client::{DetectedFace, DetectedLabel, DetectionClient, LabelOptions, TextDetection};
use async_trait::async_trait;
use imgtag_core::{ImageRef, ImgTagError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// HTTP检测客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpDetectionConfig {
    /// 检测服务根地址
    pub endpoint: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for HttpDetectionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8500".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    bucket: &'a str,
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_labels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_confidence: Option<f32>,
}

impl<'a> ImageRequest<'a> {
    fn new(image: &'a ImageRef) -> Self {
        Self {
            bucket: &image.bucket,
            key: &image.key,
            max_labels: None,
            min_confidence: None,
        }
    }
}

#[derive(Deserialize)]
struct LabelsResponse {
    #[serde(default)]
    labels: Vec<DetectedLabel>,
}

#[derive(Deserialize)]
struct FacesResponse {
    #[serde(default)]
    faces: Vec<DetectedFace>,
}

#[derive(Deserialize)]
struct TextResponse {
    #[serde(default)]
    detections: Vec<TextDetection>,
}

/// 通过HTTP与外部检测服务通信的客户端
#[derive(Clone)]
pub struct HttpDetectionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDetectionClient {
    pub fn new(config: &HttpDetectionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImgTagError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, request: &ImageRequest<'_>) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {} for s3://{}/{}", url, request.bucket, request.key);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ImgTagError::Detection(format!("{} request failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(ImgTagError::Detection(format!(
                "{} returned status {}",
                path,
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ImgTagError::Detection(format!("{} response invalid: {}", path, e)))
    }
}

#[async_trait]
impl DetectionClient for HttpDetectionClient {
    async fn detect_labels(&self, image: &ImageRef, options: LabelOptions) -> Result<Vec<DetectedLabel>> {
        let mut request = ImageRequest::new(image);
        request.max_labels = Some(options.max_labels);
        request.min_confidence = Some(options.min_confidence);

        let response: LabelsResponse = self.post("labels", &request).await?;
        Ok(response.labels)
    }

    async fn detect_faces(&self, image: &ImageRef) -> Result<Vec<DetectedFace>> {
        let response: FacesResponse = self.post("faces", &ImageRequest::new(image)).await?;
        Ok(response.faces)
    }

    async fn detect_text(&self, image: &ImageRef) -> Result<Vec<TextDetection>> {
        let response: TextResponse = self.post("text", &ImageRequest::new(image)).await?;
        Ok(response.detections)
    }
}
