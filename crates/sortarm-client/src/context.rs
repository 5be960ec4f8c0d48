//! 分拣任务运行所需的上下文

use serde::{Deserialize, Serialize};
use sortarm_driver::{
    ArmHandle, DriverError, GripConfig, GripController, MotionConfig, PoseSequencer, Sleeper,
};
use sortarm_protocol::PoseTable;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 分拣周期时序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleConfig {
    /// 每次位姿移动的运动时长（毫秒）
    pub move_duration_ms: u32,
    /// 回到 HOME 后的停留时间（毫秒）
    pub home_dwell_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        CycleConfig {
            move_duration_ms: 1000,
            home_dwell_ms: 500,
        }
    }
}

/// 手臂上下文
///
/// 执行器句柄、运动控制器与位姿表的集合，由感知循环以 `Arc` 共享给每个任务。
pub struct ArmContext {
    pub arm: ArmHandle,
    pub sequencer: PoseSequencer,
    pub gripper: GripController,
    pub poses: PoseTable,
    pub cycle: CycleConfig,
    pub sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for ArmContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArmContext")
            .field("sequencer", &self.sequencer)
            .field("gripper", &self.gripper)
            .field("poses", &self.poses)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}

impl ArmContext {
    /// 组装上下文
    ///
    /// # 错误
    ///
    /// 夹爪配置非法时返回 [`DriverError`]。
    pub fn new(
        arm: ArmHandle,
        poses: PoseTable,
        motion: MotionConfig,
        grip: GripConfig,
        cycle: CycleConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, DriverError> {
        Ok(ArmContext {
            gripper: GripController::new(grip, sleeper.clone())?,
            sequencer: PoseSequencer::new(motion, sleeper.clone()),
            arm,
            poses,
            cycle,
            sleeper,
        })
    }

    /// 全部使用默认配置
    pub fn with_defaults(arm: ArmHandle, sleeper: Arc<dyn Sleeper>) -> Result<Self, DriverError> {
        Self::new(
            arm,
            PoseTable::default(),
            MotionConfig::default(),
            GripConfig::default(),
            CycleConfig::default(),
            sleeper,
        )
    }

    pub(crate) fn home_dwell(&self) -> Duration {
        Duration::from_millis(self.cycle.home_dwell_ms)
    }
}
