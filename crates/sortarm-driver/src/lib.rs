//! 驱动层模块
//!
//! 本模块在舵机执行器之上提供两类动作：
//! - [`PoseSequencer`]：按固定顺序把手臂移动到标定位姿
//! - [`GripController`]：无力传感器的自适应夹取（堵转检测）
//!
//! 两者都不持有执行器，调用方在每次动作时以 `&mut dyn JointActuator`
//! 借入，从而保证执行器句柄由上层显式管理。

mod error;
pub mod gripper;
pub mod sequencer;
pub mod timing;

pub use error::DriverError;
pub use gripper::{GripConfig, GripController, GripOutcome, GripState};
pub use sequencer::{MotionConfig, PoseSequencer};
pub use timing::{NoSleep, RecordingSleeper, Sleeper, SpinSleeper};

use parking_lot::Mutex;
use sortarm_hal::JointActuator;
use std::sync::Arc;

/// 共享的执行器句柄
///
/// 同一时刻只有一个分拣任务持有锁。
pub type ArmHandle = Arc<Mutex<Box<dyn JointActuator>>>;

/// 把执行器包装为共享句柄
pub fn arm_handle<A: JointActuator + 'static>(actuator: A) -> ArmHandle {
    Arc::new(Mutex::new(Box::new(actuator)))
}
