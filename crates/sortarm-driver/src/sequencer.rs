//! 位姿序列执行
//!
//! 把一个 5 关节位姿拆成逐关节写入：
//!
//! ```text
//! J1 ─10ms─ J2 ─10ms─ J3 ─10ms─ J4 ─10ms─ (100ms) J5[×1.2] ─10ms─ 等待 duration
//! ```
//!
//! J5 是最慢到位的轴，单独延后下发并给更长的运动时长，避免与其余四轴
//! 的运动重叠。写入失败立即返回，后续关节不再写入。

use crate::timing::Sleeper;
use serde::{Deserialize, Serialize};
use sortarm_hal::{ActuatorError, JointActuator};
use sortarm_protocol::{JointId, JointPose};
use std::sync::Arc;
use std::time::Duration;

/// 运动时序配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// 相邻两次写入之间的间隔（毫秒）
    pub inter_write_settle_ms: u64,
    /// 下发 J5 之前的额外停顿（毫秒）
    pub last_joint_pause_ms: u64,
    /// J5 运动时长倍数
    pub last_joint_duration_factor: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            inter_write_settle_ms: 10,
            last_joint_pause_ms: 100,
            last_joint_duration_factor: 1.2,
        }
    }
}

impl MotionConfig {
    /// J5 的运动时长（截断取整）
    pub fn last_joint_duration(&self, duration_ms: u32) -> u32 {
        // 加一个极小量，避免 1000 * 1.2 这类乘积因浮点误差被截成 1199
        (f64::from(duration_ms) * self.last_joint_duration_factor + 1e-9).floor() as u32
    }
}

/// 位姿序列执行器
#[derive(Debug, Clone)]
pub struct PoseSequencer {
    config: MotionConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl PoseSequencer {
    pub fn new(config: MotionConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        PoseSequencer { config, sleeper }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// 移动到目标位姿
    ///
    /// 返回时整个手臂已按 `duration_ms` 等待到位。
    ///
    /// # 错误
    ///
    /// 任意一次写入失败即返回该错误。
    pub fn move_to(
        &self,
        arm: &mut dyn JointActuator,
        pose: &JointPose,
        duration_ms: u32,
    ) -> Result<(), ActuatorError> {
        let settle = Duration::from_millis(self.config.inter_write_settle_ms);

        for (joint, angle) in pose.iter() {
            let duration = if joint == JointId::J5 {
                self.sleeper
                    .sleep(Duration::from_millis(self.config.last_joint_pause_ms));
                self.config.last_joint_duration(duration_ms)
            } else {
                duration_ms
            };
            arm.write(joint, angle, duration)?;
            tracing::debug!("{} -> {} ({}ms)", joint, angle, duration);
            self.sleeper.sleep(settle);
        }

        tracing::debug!("Pose {} issued, settling {}ms", pose, duration_ms);
        self.sleeper.sleep(Duration::from_millis(u64::from(duration_ms)));
        Ok(())
    }
}
