//! OCR文本清洗与分词

use crate::client::{TextDetection, TextGranularity};

/// 清洗后的OCR文本
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcrText {
    /// 保留空格的文本片段，用于模式提取
    pub chunks: Vec<String>,
    /// 单词流，用于关键词匹配
    pub words: Vec<String>,
}

impl OcrText {
    pub fn from_detections(detections: &[TextDetection]) -> Self {
        let mut text = Self::default();

        for detection in detections {
            if detection.text.is_empty() {
                continue;
            }
            if !matches!(detection.granularity, TextGranularity::Word | TextGranularity::Line) {
                continue;
            }

            if let Some(chunk) = clean_fragment(&detection.text) {
                text.words.extend(tokenize(&chunk));
                text.chunks.push(chunk);
            }
        }

        text
    }
}

fn is_retained(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '+' | '.' | '-' | ' ')
}

/// 小写并去除 `[a-z0-9+.\- ]` 以外的字符，结果不足两个字符时丢弃
pub fn clean_fragment(raw: &str) -> Option<String> {
    let cleaned: String = raw.to_lowercase().chars().filter(|c| is_retained(*c)).collect();

    if cleaned.chars().count() < 2 {
        None
    } else {
        Some(cleaned)
    }
}

/// 按空白拆分片段，丢弃单字符单词
pub fn tokenize(chunk: &str) -> Vec<String> {
    chunk
        .split_whitespace()
        .filter(|token| token.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
