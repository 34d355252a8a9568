//! 存储记录解码
//!
//! 记录的字段名随版本变化过：当前版本使用 `ImageID`/`Labels`/`ImageUrl`/`ObjectKey`，
//! 早期版本使用 `image_id`/`labels`/`image_url`/`object_key`。
//! 所有版本在此统一映射为 [`QueryResult`]。

use imgtag_core::{QueryResult, Result};
use serde::Deserialize;

/// 记录字段名版本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSchema {
    /// `ImageID`、`Labels` 等大驼峰字段
    Current,
    /// `image_id`、`labels` 等下划线字段
    Legacy,
    /// 仅有 `ObjectKey` 等部分字段
    Partial,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(rename = "ImageID")]
    image_id: Option<String>,
    #[serde(rename = "image_id")]
    legacy_image_id: Option<String>,
    #[serde(rename = "Labels")]
    labels: Option<Vec<String>>,
    #[serde(rename = "labels")]
    legacy_labels: Option<Vec<String>>,
    #[serde(rename = "ImageUrl")]
    image_url: Option<String>,
    #[serde(rename = "image_url")]
    legacy_image_url: Option<String>,
    #[serde(rename = "ObjectKey")]
    object_key: Option<String>,
    #[serde(rename = "object_key")]
    legacy_object_key: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RawItem {
    fn schema(&self) -> RecordSchema {
        if self.image_id.is_some() || self.labels.is_some() {
            RecordSchema::Current
        } else if self.legacy_image_id.is_some() || self.legacy_labels.is_some() {
            RecordSchema::Legacy
        } else {
            RecordSchema::Partial
        }
    }

    fn into_result(self) -> QueryResult {
        let image_id = present(self.image_id)
            .or_else(|| present(self.legacy_image_id))
            .or_else(|| present(self.object_key.clone()));

        let labels = self
            .labels
            .filter(|labels| !labels.is_empty())
            .or(self.legacy_labels)
            .unwrap_or_default();

        let image_url = present(self.image_url)
            .or_else(|| present(self.legacy_image_url))
            .unwrap_or_default();

        let object_key = present(self.object_key)
            .or_else(|| present(self.legacy_object_key))
            .or_else(|| image_id.clone());

        QueryResult {
            image_id,
            labels,
            image_url,
            object_key,
        }
    }
}

/// 将任意已知版本的存储记录解码为统一的查询结果
pub fn decode_item(value: serde_json::Value) -> Result<(RecordSchema, QueryResult)> {
    let raw: RawItem = serde_json::from_value(value)?;
    let schema = raw.schema();
    Ok((schema, raw.into_result()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_current_shape() {
        let (schema, result) = decode_item(json!({
            "ImageID": "cat.jpg",
            "Label": "cat",
            "Labels": ["animal", "cat"],
            "ImageUrl": "https://photos.s3.amazonaws.com/cat.jpg",
            "ObjectKey": "cat.jpg"
        }))
        .unwrap();

        assert_eq!(schema, RecordSchema::Current);
        assert_eq!(result.image_id.as_deref(), Some("cat.jpg"));
        assert_eq!(result.labels, vec!["animal", "cat"]);
        assert_eq!(result.image_url, "https://photos.s3.amazonaws.com/cat.jpg");
        assert_eq!(result.object_key.as_deref(), Some("cat.jpg"));
    }

    #[test]
    fn test_decode_legacy_shape() {
        let (schema, result) = decode_item(json!({
            "image_id": "old.png",
            "labels": ["dog"],
            "image_url": "https://legacy/old.png"
        }))
        .unwrap();

        assert_eq!(schema, RecordSchema::Legacy);
        assert_eq!(result.image_id.as_deref(), Some("old.png"));
        assert_eq!(result.labels, vec!["dog"]);
        assert_eq!(result.image_url, "https://legacy/old.png");
        // 缺少 object_key 时回退到图像ID
        assert_eq!(result.object_key.as_deref(), Some("old.png"));
    }

    #[test]
    fn test_decode_object_key_only() {
        let (schema, result) = decode_item(json!({"ObjectKey": "only-key.png"})).unwrap();

        assert_eq!(schema, RecordSchema::Partial);
        assert_eq!(result.image_id.as_deref(), Some("only-key.png"));
        assert!(result.labels.is_empty());
        assert_eq!(result.image_url, "");
        assert_eq!(result.object_key.as_deref(), Some("only-key.png"));
    }

    #[test]
    fn test_empty_values_fall_through() {
        let (_, result) = decode_item(json!({
            "ImageID": "",
            "image_id": "fallback.png",
            "Labels": [],
            "labels": ["legacy"]
        }))
        .unwrap();

        assert_eq!(result.image_id.as_deref(), Some("fallback.png"));
        assert_eq!(result.labels, vec!["legacy"]);
    }

    #[test]
    fn test_decode_nothing_known() {
        let (_, result) = decode_item(json!({"Unrelated": 1})).unwrap();
        assert_eq!(result, QueryResult::default());
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        assert!(decode_item(json!({"Labels": "not-a-list"})).is_err());
    }
}
