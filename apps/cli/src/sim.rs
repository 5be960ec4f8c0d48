//! 模拟硬件组装

use anyhow::{Context, Result};
use sortarm_sdk::hal::mock::{ScriptedClassifier, SimArm};
use sortarm_sdk::prelude::*;
use std::fs;
use std::path::Path;

/// 未提供脚本时使用的演示分类结果
const DEMO_RESPONSES: [&str; 4] = [
    r#"{"predictions": {"ripe_apple": {"confidence": 0.92}}, "predicted_classes": ["ripe_apple"]}"#,
    r#"{"predictions": {"apple": {"confidence": 0.30}}, "predicted_classes": ["apple"]}"#,
    r#"{"predictions": {"rotten_banana": {"confidence": 0.77}}, "predicted_classes": ["rotten_banana"]}"#,
    r#"{"predictions": [{"class": "unripe_mango", "confidence": 0.64}]}"#,
];

/// 选择延时实现
pub fn sleeper(realtime: bool) -> Arc<dyn Sleeper> {
    if realtime {
        Arc::new(SpinSleeper)
    } else {
        Arc::new(NoSleep)
    }
}

/// 创建模拟臂，`contact` 为夹爪中物体的接触角
pub fn arm(contact: Option<f64>) -> SimArm {
    let arm = SimArm::new();
    arm.set_object(contact.map(Deg));
    arm
}

/// 用脚本文件（JSON 数组，每个元素是一次分类服务响应）创建分类器
pub fn classifier(script: Option<&Path>) -> Result<ScriptedClassifier> {
    let classifier = ScriptedClassifier::new();
    match script {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display()))?;
            let responses: Vec<serde_json::Value> = serde_json::from_str(&content)
                .with_context(|| format!("Script {} must be a JSON array", path.display()))?;
            for response in responses {
                classifier.push_response(response.to_string());
            }
        },
        None => {
            for response in DEMO_RESPONSES {
                classifier.push_response(response);
            }
        },
    }
    Ok(classifier)
}
