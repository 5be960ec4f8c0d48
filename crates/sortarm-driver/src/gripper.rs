//! 自适应夹爪控制
//!
//! 没有力传感器时，唯一能说明"夹爪碰到物体"的信号是：下发的角度增量没有
//! 被执行到位。闭合过程因此是一个小步进的闭环：
//!
//! ```text
//! loop attempt in 1..=max_attempts:
//!     a      = read()
//!     target = a + step
//!     write(target); sleep(delay)
//!     a'     = read()
//!     |a' - target| >= tolerance  → 本次判定为堵转
//!     连续 stall_confirmations 次堵转 → GripDetected
//! 用完 max_attempts → MaxAttemptsReached（降级成功，继续分拣）
//! ```
//!
//! 连续确认（Debounce）可以滤掉单次读数抖动；到位的一次会把计数清零。
//! 无论打开还是闭合，返回前都有固定的稳定等待。

use crate::error::DriverError;
use crate::timing::Sleeper;
use serde::{Deserialize, Serialize};
use sortarm_hal::{ActuatorError, JointActuator};
use sortarm_protocol::{Deg, JointId};
use std::sync::Arc;
use std::time::Duration;

/// 夹爪配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripConfig {
    /// 完全打开的角度
    pub open_angle: Deg,
    /// 打开动作的运动时长（毫秒）
    pub open_duration_ms: u32,
    /// 每次闭合的步进角度
    pub step: Deg,
    /// 每次步进的运动时长（毫秒）
    pub step_duration_ms: u32,
    /// 每次步进后的等待（毫秒）
    pub step_delay_ms: u64,
    /// 最大尝试次数
    pub max_attempts: u32,
    /// 到位判定容差
    pub stall_tolerance: Deg,
    /// 连续 N 次未到位才认为夹住
    ///
    /// 接触发生在最后 N-1 次尝试内时来不及确认，结果是
    /// [`GripOutcome::MaxAttemptsReached`]，夹爪仍停在接触角。
    pub stall_confirmations: u32,
    /// 动作结束后的稳定等待（毫秒）
    pub settle_ms: u64,
}

impl Default for GripConfig {
    fn default() -> Self {
        GripConfig {
            open_angle: Deg(60.0),
            open_duration_ms: 400,
            step: Deg(5.0),
            step_duration_ms: 200,
            step_delay_ms: 100,
            max_attempts: 50,
            stall_tolerance: Deg(1.0),
            stall_confirmations: 3,
            settle_ms: 500,
        }
    }
}

impl GripConfig {
    /// 检查参数
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.max_attempts == 0 {
            return Err(DriverError::invalid("max_attempts", "must be at least 1"));
        }
        if self.step <= Deg::ZERO {
            return Err(DriverError::invalid(
                "step",
                format!("must be positive, got {}", self.step),
            ));
        }
        if self.stall_tolerance <= Deg::ZERO || self.stall_tolerance > self.step {
            return Err(DriverError::invalid(
                "stall_tolerance",
                format!("must be in (0, step], got {}", self.stall_tolerance),
            ));
        }
        if self.stall_confirmations == 0 || self.stall_confirmations > self.max_attempts {
            return Err(DriverError::invalid(
                "stall_confirmations",
                format!("must be in [1, max_attempts], got {}", self.stall_confirmations),
            ));
        }
        Ok(())
    }
}

/// 夹爪动作结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GripOutcome {
    /// 已打开
    Opened { angle: Deg },
    /// 检测到堵转（夹住物体）
    GripDetected { angle: Deg, attempt: u32 },
    /// 用完尝试次数仍未检测到堵转
    MaxAttemptsReached { angle: Deg, attempts: u32 },
}

impl GripOutcome {
    /// 最终角度
    pub fn angle(&self) -> Deg {
        match *self {
            GripOutcome::Opened { angle }
            | GripOutcome::GripDetected { angle, .. }
            | GripOutcome::MaxAttemptsReached { angle, .. } => angle,
        }
    }

    /// 是否为降级夹取
    pub fn is_degraded(&self) -> bool {
        matches!(self, GripOutcome::MaxAttemptsReached { .. })
    }
}

/// 闭合过程中的夹爪状态
///
/// 只在一次 `clamp` 调用内存在，每个分拣周期都从打开状态重新开始。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GripState {
    /// 当前下发的目标角度
    pub commanded: Deg,
    /// 当前尝试序号（从 1 计）
    pub attempt: u32,
    /// 连续未到位次数
    pub consecutive_stalls: u32,
}

/// 自适应夹爪控制器
#[derive(Debug, Clone)]
pub struct GripController {
    config: GripConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl GripController {
    pub fn new(config: GripConfig, sleeper: Arc<dyn Sleeper>) -> Result<Self, DriverError> {
        config.validate()?;
        Ok(GripController { config, sleeper })
    }

    pub fn config(&self) -> &GripConfig {
        &self.config
    }

    /// 打开（`close = false`）或自适应闭合（`close = true`）
    pub fn clamp(
        &self,
        arm: &mut dyn JointActuator,
        close: bool,
    ) -> Result<GripOutcome, ActuatorError> {
        let outcome = if close {
            self.close_adaptive(arm)?
        } else {
            self.open(arm)?
        };
        self.sleeper
            .sleep(Duration::from_millis(self.config.settle_ms));
        Ok(outcome)
    }

    fn open(&self, arm: &mut dyn JointActuator) -> Result<GripOutcome, ActuatorError> {
        arm.write(
            JointId::Gripper,
            self.config.open_angle,
            self.config.open_duration_ms,
        )?;
        tracing::debug!("Gripper opened to {}", self.config.open_angle);
        Ok(GripOutcome::Opened {
            angle: self.config.open_angle,
        })
    }

    fn close_adaptive(&self, arm: &mut dyn JointActuator) -> Result<GripOutcome, ActuatorError> {
        let delay = Duration::from_millis(self.config.step_delay_ms);
        let mut state = GripState::default();
        let mut last = arm.read(JointId::Gripper)?;

        for attempt in 1..=self.config.max_attempts {
            state.attempt = attempt;
            let current = if attempt == 1 {
                last
            } else {
                arm.read(JointId::Gripper)?
            };
            state.commanded = current + self.config.step;
            arm.write(
                JointId::Gripper,
                state.commanded,
                self.config.step_duration_ms,
            )?;
            self.sleeper.sleep(delay);

            last = arm.read(JointId::Gripper)?;
            if (last - state.commanded).abs() >= self.config.stall_tolerance {
                state.consecutive_stalls += 1;
            } else {
                state.consecutive_stalls = 0;
            }
            tracing::trace!(?state, reached = %last, "grip step");

            if state.consecutive_stalls >= self.config.stall_confirmations {
                tracing::info!("Grip detected at angle: {} (attempt {})", last, attempt);
                return Ok(GripOutcome::GripDetected {
                    angle: last,
                    attempt,
                });
            }
        }

        tracing::warn!(
            "Max attempts ({}) reached, grip might not be perfect (angle {})",
            self.config.max_attempts,
            last
        );
        Ok(GripOutcome::MaxAttemptsReached {
            angle: last,
            attempts: self.config.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{NoSleep, RecordingSleeper};
    use proptest::prelude::*;
    use sortarm_hal::mock::{ArmFault, SimArm};

    fn controller(config: GripConfig) -> GripController {
        GripController::new(config, Arc::new(NoSleep)).unwrap()
    }

    #[test]
    fn test_open_writes_once_without_reading() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let grip = GripController::new(GripConfig::default(), sleeper.clone()).unwrap();
        let mut arm = SimArm::new();

        let outcome = grip.clamp(&mut arm, false).unwrap();

        assert_eq!(outcome, GripOutcome::Opened { angle: Deg(60.0) });
        let writes = arm.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].joint, JointId::Gripper);
        assert_eq!(writes[0].angle, Deg(60.0));
        assert_eq!(writes[0].duration_ms, 400);
        assert_eq!(arm.read_count(), 0);
        assert_eq!(sleeper.calls(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn test_close_detects_object() {
        let grip = controller(GripConfig::default());
        let mut arm = SimArm::new().with_object(Deg(82.0));
        arm.set_angle(JointId::Gripper, Deg(60.0));

        let outcome = grip.clamp(&mut arm, true).unwrap();

        // 60 → 65 → 70 → 75 → 80 到位，之后 85 三次被挡在 82
        assert_eq!(
            outcome,
            GripOutcome::GripDetected {
                angle: Deg(82.0),
                attempt: 7
            }
        );
        assert_eq!(arm.writes_to(JointId::Gripper).len(), 7);
    }

    #[test]
    fn test_jammed_gripper_confirms_on_third_attempt() {
        let grip = controller(GripConfig::default());
        let mut arm = SimArm::new().with_jammed_gripper();

        let outcome = grip.clamp(&mut arm, true).unwrap();

        assert!(matches!(outcome, GripOutcome::GripDetected { attempt: 3, .. }));
        assert_eq!(arm.writes_to(JointId::Gripper).len(), 3);
    }

    #[test]
    fn test_stall_confirmations_configurable() {
        let config = GripConfig {
            stall_confirmations: 2,
            ..GripConfig::default()
        };
        let grip = controller(config);
        // 限位 180 前一直能到位，到 180 后两次堵转
        let mut arm = SimArm::new();
        arm.set_angle(JointId::Gripper, Deg(170.0));

        let outcome = grip.clamp(&mut arm, true).unwrap();
        assert_eq!(
            outcome,
            GripOutcome::GripDetected {
                angle: Deg(180.0),
                attempt: 4
            }
        );
    }

    #[test]
    fn test_max_attempts_reached_is_degraded_success() {
        let config = GripConfig {
            max_attempts: 4,
            ..GripConfig::default()
        };
        let grip = controller(config);
        let mut arm = SimArm::new();
        arm.set_angle(JointId::Gripper, Deg(60.0));

        let outcome = grip.clamp(&mut arm, true).unwrap();

        assert_eq!(
            outcome,
            GripOutcome::MaxAttemptsReached {
                angle: Deg(80.0),
                attempts: 4
            }
        );
        assert!(outcome.is_degraded());
        assert_eq!(arm.writes_to(JointId::Gripper).len(), 4);
    }

    #[test]
    fn test_late_contact_ends_as_max_attempts() {
        let config = GripConfig {
            max_attempts: 6,
            ..GripConfig::default()
        };
        let grip = controller(config);
        let mut arm = SimArm::new().with_object(Deg(82.0));
        arm.set_angle(JointId::Gripper, Deg(60.0));

        let outcome = grip.clamp(&mut arm, true).unwrap();

        // 第 5、6 次堵转，只确认了两次
        assert_eq!(
            outcome,
            GripOutcome::MaxAttemptsReached {
                angle: Deg(82.0),
                attempts: 6
            }
        );
        assert_eq!(arm.read(JointId::Gripper).unwrap(), Deg(82.0));
    }

    #[test]
    fn test_close_step_timing() {
        let sleeper = Arc::new(RecordingSleeper::new());
        let grip = GripController::new(GripConfig::default(), sleeper.clone()).unwrap();
        let mut arm = SimArm::new().with_jammed_gripper();

        grip.clamp(&mut arm, true).unwrap();

        let ms: Vec<u128> = sleeper.calls().iter().map(Duration::as_millis).collect();
        assert_eq!(ms, vec![100, 100, 100, 500]);
        assert!(arm.writes().iter().all(|w| w.duration_ms == 200));
    }

    #[test]
    fn test_read_fault_propagates() {
        let grip = controller(GripConfig::default());
        let mut arm = SimArm::new();
        arm.inject_fault(ArmFault::ReadOf(JointId::Gripper));

        let err = grip.clamp(&mut arm, true).unwrap_err();
        assert!(matches!(err, ActuatorError::Read { joint: JointId::Gripper, .. }));
        assert!(arm.writes().is_empty());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero_attempts = GripConfig {
            max_attempts: 0,
            ..GripConfig::default()
        };
        assert!(GripController::new(zero_attempts, Arc::new(NoSleep)).is_err());

        let negative_step = GripConfig {
            step: Deg(-5.0),
            ..GripConfig::default()
        };
        assert!(negative_step.validate().is_err());

        let too_many_confirmations = GripConfig {
            max_attempts: 2,
            stall_confirmations: 3,
            ..GripConfig::default()
        };
        assert!(too_many_confirmations.validate().is_err());
    }

    proptest! {
        #[test]
        fn prop_clamp_terminates_within_max_attempts(
            start in 0u32..180,
            contact in proptest::option::of(0u32..180),
            max_attempts in 3u32..60,
        ) {
            let config = GripConfig { max_attempts, ..GripConfig::default() };
            let grip = controller(config);
            let mut arm = SimArm::new();
            arm.set_angle(JointId::Gripper, Deg(f64::from(start)));
            arm.set_object(contact.map(|c| Deg(f64::from(c))));

            let outcome = grip.clamp(&mut arm, true).unwrap();
            let attempts = arm.writes_to(JointId::Gripper).len() as u32;

            match outcome {
                GripOutcome::GripDetected { attempt, .. } => {
                    prop_assert!(attempt <= max_attempts);
                    prop_assert_eq!(attempts, attempt);
                },
                GripOutcome::MaxAttemptsReached { attempts: reported, .. } => {
                    prop_assert_eq!(reported, max_attempts);
                    prop_assert_eq!(attempts, max_attempts);
                },
                GripOutcome::Opened { .. } => prop_assert!(false, "close never opens"),
            }
        }
    }
}
