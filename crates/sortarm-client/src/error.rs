use sortarm_hal::FrameError;
use thiserror::Error;

/// 感知循环的致命错误
///
/// 两种错误都会结束循环；相机在返回前已被释放。
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PerceptionError {
    #[error("Could not access the camera: {0}")]
    CameraUnavailable(#[source] FrameError),

    #[error("Failed to capture frame: {0}")]
    CaptureFailed(#[source] FrameError),
}
