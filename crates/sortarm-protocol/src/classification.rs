//! 云端分类器响应解析
//!
//! 托管分类服务返回 JSON 文档，支持两种形态：
//!
//! ```text
//! // 多标签分类：类别 -> 置信度映射，predicted_classes 给出命中的类别
//! { "predictions": { "ripe_apple": { "confidence": 0.92 } },
//!   "predicted_classes": ["ripe_apple"] }
//!
//! // 目标检测：列表形式
//! { "predictions": [ { "class": "ripe_apple", "confidence": 0.92 } ] }
//! ```
//!
//! 缺少 `predictions` 字段表示"没有检测结果"。单个条目缺字段或置信度
//! 越界时跳过该条目，不影响其余条目。

use crate::detection::Detection;
use crate::error::ProtocolError;
use serde_json::Value;

/// 解析响应正文
///
/// 只有正文不是合法 JSON 对象时才返回错误。
pub fn decode_response(body: &str) -> Result<Vec<Detection>, ProtocolError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(ProtocolError::UnexpectedShape(
            "response root is not an object".to_string(),
        ));
    }
    Ok(detections_from_value(&value))
}

/// 从已解析的 JSON 中提取检测结果
pub fn detections_from_value(value: &Value) -> Vec<Detection> {
    match value.get("predictions") {
        Some(Value::Object(map)) => {
            let classes: Vec<&str> = match value.get("predicted_classes") {
                Some(Value::Array(classes)) => classes.iter().filter_map(Value::as_str).collect(),
                _ => map.keys().map(String::as_str).collect(),
            };
            classes
                .into_iter()
                .filter_map(|class| {
                    let confidence = map.get(class).and_then(confidence_of)?;
                    Some(Detection::new(class, confidence))
                })
                .collect()
        },
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let label = item
                    .get("class")
                    .or_else(|| item.get("label"))
                    .and_then(Value::as_str)?;
                let confidence = confidence_of(item)?;
                Some(Detection::new(label, confidence))
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn confidence_of(entry: &Value) -> Option<f64> {
    let confidence = entry.get("confidence")?.as_f64()?;
    (0.0..=1.0).contains(&confidence).then_some(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classification_map_form() {
        let body = r#"{
            "time": 0.05,
            "predictions": {
                "ripe_apple": { "confidence": 0.92, "class_id": 0 },
                "rotten_apple": { "confidence": 0.03, "class_id": 1 }
            },
            "predicted_classes": ["ripe_apple"]
        }"#;

        let detections = decode_response(body).unwrap();
        assert_eq!(detections, vec![Detection::new("ripe_apple", 0.92)]);
    }

    #[test]
    fn test_map_form_without_predicted_classes_uses_all_keys() {
        let value = json!({
            "predictions": {
                "apple": { "confidence": 0.3 },
                "rotten_apple": { "confidence": 0.8 }
            }
        });

        let mut detections = detections_from_value(&value);
        detections.sort_by(|a, b| a.label.cmp(&b.label));
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[1], Detection::new("rotten_apple", 0.8));
    }

    #[test]
    fn test_detection_list_form() {
        let value = json!({
            "predictions": [
                { "class": "ripe_banana", "confidence": 0.77, "x": 10, "y": 20 },
                { "label": "apple", "confidence": 0.6 }
            ]
        });

        let detections = detections_from_value(&value);
        assert_eq!(
            detections,
            vec![Detection::new("ripe_banana", 0.77), Detection::new("apple", 0.6)]
        );
    }

    #[test]
    fn test_missing_predictions_means_no_detections() {
        assert!(decode_response(r#"{"message": "model busy"}"#).unwrap().is_empty());
        assert!(detections_from_value(&json!({ "predictions": null })).is_empty());
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let value = json!({
            "predictions": {
                "ripe_apple": { "confidence": "high" },
                "rotten_apple": { "confidence": 1.7 },
                "apple": { "confidence": 0.55 }
            },
            "predicted_classes": ["ripe_apple", "rotten_apple", "apple", "pear"]
        });

        assert_eq!(detections_from_value(&value), vec![Detection::new("apple", 0.55)]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(decode_response("not json"), Err(ProtocolError::InvalidJson(_))));
        assert!(matches!(decode_response("[1, 2]"), Err(ProtocolError::UnexpectedShape(_))));
    }
}
