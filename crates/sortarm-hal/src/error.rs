//! 外部协作方错误类型
//!
//! - `ActuatorError`: 舵机读写失败，在单个分拣任务内处理
//! - `FrameError`: 相机打开或读帧失败，对感知循环是致命的
//! - `ClassifierError`: 分类服务失败，按"无检测结果"处理

use sortarm_protocol::{JointId, ProtocolError};
use thiserror::Error;

/// 舵机执行器错误
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ActuatorError {
    /// 写入失败
    #[error("Servo write failed on joint {joint}: {reason}")]
    Write {
        /// 关节
        joint: JointId,
        /// 原因
        reason: String,
    },

    /// 读取失败
    #[error("Servo read failed on joint {joint}: {reason}")]
    Read {
        /// 关节
        joint: JointId,
        /// 原因
        reason: String,
    },

    /// 总线不可用
    #[error("Servo bus unavailable: {0}")]
    BusUnavailable(String),
}

impl ActuatorError {
    /// 创建写入错误
    pub fn write(joint: JointId, reason: impl Into<String>) -> Self {
        Self::Write {
            joint,
            reason: reason.into(),
        }
    }

    /// 创建读取错误
    pub fn read(joint: JointId, reason: impl Into<String>) -> Self {
        Self::Read {
            joint,
            reason: reason.into(),
        }
    }

    /// 出错的关节（总线级错误没有关节）
    pub fn joint(&self) -> Option<JointId> {
        match self {
            Self::Write { joint, .. } | Self::Read { joint, .. } => Some(*joint),
            Self::BusUnavailable(_) => None,
        }
    }
}

/// 相机帧源错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("Could not open frame source: {0}")]
    OpenFailed(String),

    #[error("Failed to read frame: {0}")]
    ReadFailed(String),

    #[error("Frame source is not open")]
    NotOpen,
}

/// 分类器错误
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// 请求未送达或服务端报错
    #[error("Classifier transport error: {0}")]
    Transport(String),

    /// 响应无法解析
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
