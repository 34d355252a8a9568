//! # imgtag 视觉分析模块
//!
//! 将外部检测服务返回的原始信号转换为规范化的标签集合，包括：
//! - 检测客户端接口及HTTP实现
//! - 品牌与技术关键词分类
//! - OCR文本清洗与分词
//! - 结构化字段（患者姓名、疾病）提取
//! - 标签集合与顶级标签计算

pub mod client;
pub mod extractor;
pub mod http;
pub mod keywords;
pub mod normalizer;
pub mod ocr;
pub mod pipeline;

pub use client::{
    DetectionClient, DetectedFace, DetectedLabel, LabelOptions, StaticDetectionClient,
    TextDetection, TextGranularity,
};
pub use extractor::extract_fields;
pub use http::{HttpDetectionClient, HttpDetectionConfig};
pub use normalizer::{build_label_set, resolve_top_label, tech_tools};
pub use pipeline::LabelingPipeline;
