//! 分类响应解析命令

use anyhow::{Context, Result};
use clap::Args;
use sortarm_sdk::SorterConfig;
use sortarm_sdk::protocol::{SortRecord, decode_response};
use std::fs;
use std::path::{Path, PathBuf};

/// 分类命令参数
#[derive(Args, Debug)]
pub struct ClassifyCommand {
    /// 分类服务的 JSON 响应文件
    pub file: PathBuf,

    /// 置信度阈值，默认取配置中的 perception.confidence_threshold
    #[arg(short, long)]
    pub threshold: Option<f64>,
}

impl ClassifyCommand {
    pub fn execute(&self, config_path: &Path) -> Result<()> {
        let threshold = match self.threshold {
            Some(t) => t,
            None => SorterConfig::load_or_default(config_path)?.perception.confidence_threshold,
        };
        let body = fs::read_to_string(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        let detections = decode_response(&body)?;

        if detections.is_empty() {
            println!("No fruits detected.");
            return Ok(());
        }
        for detection in &detections {
            let record = SortRecord::from_detection(detection);
            let verdict = if detection.exceeds(threshold) {
                format!("-> {}", record.bin())
            } else {
                format!("skipped (confidence <= {})", threshold)
            };
            println!("{}  {}", record, verdict);
        }
        Ok(())
    }
}
