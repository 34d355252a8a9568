//! 结构化字段提取
//!
//! 在OCR全文上做两次互相独立的不区分大小写匹配，各自只取第一个匹配。

use imgtag_core::ExtractedFields;
use once_cell::sync::Lazy;
use regex::Regex;

static SUBJECT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(patient|patient name|name|pt)[:\-\s]+([a-zA-Z ]{2,50})")
        .expect("subject pattern is valid")
});

static CONDITION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(disease|diagnosis|problem|issue)[:\-\s]+([a-zA-Z ]{2,50})")
        .expect("condition pattern is valid")
});

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    let value = pattern.captures(text)?.get(2)?.as_str().trim().to_lowercase();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// 从全文中提取患者姓名与疾病
pub fn extract_fields(full_text: &str) -> ExtractedFields {
    ExtractedFields {
        subject_name: first_capture(&SUBJECT_PATTERN, full_text),
        condition: first_capture(&CONDITION_PATTERN, full_text),
    }
}
