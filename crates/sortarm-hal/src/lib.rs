//! # Sortarm HAL
//!
//! 外部协作方的抽象层：舵机执行器、相机帧源、图像分类器。
//!
//! 核心逻辑只依赖这里定义的 trait，真实设备驱动与模拟实现可以互换。
//! 启用 `mock` feature 后提供 [`mock`] 模块中的模拟实现。
//!
//! ```text
//! PerceptionLoop ──> FrameSource / Classifier
//! SortTask ──> PoseSequencer / GripController ──> JointActuator
//! ```

pub mod classifier;
pub mod error;

#[cfg(feature = "mock")]
pub mod mock;

pub use classifier::{ClassifierTransport, JsonClassifier};
pub use error::{ActuatorError, ClassifierError, FrameError};

use sortarm_protocol::{Deg, Detection, JointId};

/// 舵机执行器
///
/// 写入是"按时长完成"的异步语义：`write` 下发目标角度与运动时长后立即返回，
/// 不提供到位确认。
pub trait JointActuator: Send {
    /// 下发目标角度
    fn write(&mut self, joint: JointId, angle: Deg, duration_ms: u32) -> Result<(), ActuatorError>;

    /// 读取当前角度
    fn read(&mut self, joint: JointId) -> Result<Deg, ActuatorError>;
}

impl<A: JointActuator + ?Sized> JointActuator for Box<A> {
    fn write(&mut self, joint: JointId, angle: Deg, duration_ms: u32) -> Result<(), ActuatorError> {
        (**self).write(joint, angle, duration_ms)
    }

    fn read(&mut self, joint: JointId) -> Result<Deg, ActuatorError> {
        (**self).read(joint)
    }
}

/// 一帧图像
///
/// 内容对核心逻辑不透明，原样交给分类器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 帧序号（帧源内单调递增）
    pub sequence: u64,
    pub width: u32,
    pub height: u32,
    /// 编码后的图像数据（通常为 JPEG）
    pub data: Vec<u8>,
}

/// 相机帧源
///
/// 由感知循环独占。
pub trait FrameSource: Send {
    /// 打开设备
    fn open(&mut self) -> Result<(), FrameError>;

    /// 读取一帧
    fn read(&mut self) -> Result<Frame, FrameError>;

    /// 释放设备（可重复调用）
    fn release(&mut self);
}

/// 图像分类器
pub trait Classifier: Send {
    /// 提交一帧，返回检测结果集合
    fn classify(&mut self, frame: &Frame) -> Result<Vec<Detection>, ClassifierError>;
}
