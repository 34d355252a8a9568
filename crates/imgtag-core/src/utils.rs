//! 通用工具函数

/// 由桶名和对象键拼接图像访问地址
pub fn image_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// 规范化查询标签：去除首尾空白并转为小写，空标签视为未提供
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_lowercase())
    }
}
