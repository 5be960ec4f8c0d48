//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use sortarm_sdk::prelude::*;
//! ```

pub use sortarm_client::{
    ArmContext, CancelToken, CycleConfig, DispatchPolicy, GateClaim, PerceptionConfig,
    PerceptionLoop, ReadyGate, RecordLog, Reporter, SessionSummary, SortEvent, SortOutcome,
    SortStage, SortTask, SorterStatus, StatusBoard,
};
pub use sortarm_control::{SortController, SorterConfig};
pub use sortarm_driver::{
    ArmHandle, GripConfig, GripController, GripOutcome, MotionConfig, NoSleep, PoseSequencer,
    Sleeper, SpinSleeper, arm_handle,
};
pub use sortarm_hal::{Classifier, Frame, FrameSource, JointActuator};
pub use sortarm_protocol::{
    Bin, Deg, Detection, JointId, JointPose, NamedPose, PoseTable, Ripeness, SortRecord,
};

// 错误类型
pub use sortarm_client::PerceptionError;
pub use sortarm_control::ControlError;
pub use sortarm_driver::DriverError;
pub use sortarm_hal::{ActuatorError, ClassifierError, FrameError};
pub use sortarm_protocol::ProtocolError;

pub use std::sync::Arc;
