//! 配置文件
//!
//! 默认路径 `<config_dir>/sortarm/sortarm.toml`，所有字段都可省略：
//!
//! ```toml
//! [poses]
//! bin_a = [30, 135, 0, 0, 90]
//!
//! [grip]
//! step = 4
//!
//! [perception]
//! confidence_threshold = 0.6
//! dispatch = "queue"
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use sortarm_client::{ArmContext, CycleConfig, PerceptionConfig};
use sortarm_driver::{ArmHandle, DriverError, GripConfig, MotionConfig, Sleeper};
use sortarm_protocol::PoseTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 分拣系统配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SorterConfig {
    pub poses: PoseTable,
    pub motion: MotionConfig,
    pub grip: GripConfig,
    pub cycle: CycleConfig,
    pub perception: PerceptionConfig,
}

impl SorterConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().context("Could not determine config directory")?;
        path.push("sortarm");
        path.push("sortarm.toml");
        Ok(path)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SorterConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// 文件存在则加载，否则使用默认配置
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("{} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// 检查取值范围
    pub fn validate(&self) -> Result<()> {
        self.grip.validate()?;
        let threshold = self.perception.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("perception.confidence_threshold must be within [0, 1], got {}", threshold);
        }
        if self.perception.gate_poll_ms == 0 {
            bail!("perception.gate_poll_ms must be at least 1");
        }
        if !(self.motion.last_joint_duration_factor > 0.0) {
            bail!(
                "motion.last_joint_duration_factor must be positive, got {}",
                self.motion.last_joint_duration_factor
            );
        }
        for (pose, joint_pose) in self.poses.iter() {
            for (joint, angle) in joint_pose.iter() {
                if !(0.0..=360.0).contains(&angle.value()) {
                    bail!("poses.{} {} is out of range: {}", pose.name(), joint, angle);
                }
            }
        }
        Ok(())
    }

    /// 用本配置组装手臂上下文
    pub fn build_context(
        &self,
        arm: ArmHandle,
        sleeper: Arc<dyn Sleeper>,
    ) -> std::result::Result<ArmContext, DriverError> {
        ArmContext::new(
            arm,
            self.poses.clone(),
            self.motion.clone(),
            self.grip.clone(),
            self.cycle.clone(),
            sleeper,
        )
    }
}
