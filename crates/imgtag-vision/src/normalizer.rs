//! 标签规范化与顶级标签选择

use crate::keywords::is_tech_keyword;
use imgtag_core::{DetectionResult, ExtractedFields, LabelSet, PERSON_DETECTED_LABEL, UNKNOWN_LABEL};
use std::collections::BTreeSet;

/// OCR单词中出现的技术关键词
pub fn tech_tools(detection: &DetectionResult) -> BTreeSet<String> {
    detection
        .ocr_words
        .iter()
        .filter(|word| is_tech_keyword(word))
        .cloned()
        .collect()
}

/// 合并全部信号，得到去重排序后的标签集合
pub fn build_label_set(detection: &DetectionResult, fields: &ExtractedFields) -> LabelSet {
    let mut labels: Vec<String> = Vec::new();

    labels.extend(detection.generic_labels.iter().cloned());
    labels.extend(detection.ocr_words.iter().cloned());
    labels.extend(detection.brand_tags.iter().cloned());
    labels.extend(tech_tools(detection));

    if detection.person_detected {
        labels.push(PERSON_DETECTED_LABEL.to_string());
    }
    labels.extend(fields.patient_tag());
    labels.extend(fields.disease_tag());

    labels.into_iter().collect()
}

/// 按优先级选择顶级标签：疾病 > 品牌 > 技术工具 > 通用标签 > OCR单词 > "unknown"
pub fn resolve_top_label(detection: &DetectionResult, fields: &ExtractedFields) -> String {
    if let Some(disease) = fields.disease_tag() {
        return disease;
    }
    // BTreeSet 有序，第一个即字典序最小
    if let Some(brand) = detection.brand_tags.iter().next() {
        return brand.clone();
    }
    if let Some(tool) = tech_tools(detection).into_iter().next() {
        return tool;
    }

    detection
        .generic_labels
        .first()
        .or_else(|| detection.ocr_words.first())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}
