//! 模拟相机

use crate::error::FrameError;
use crate::{Frame, FrameSource};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct CameraState {
    open: bool,
    fail_open: bool,
    /// 第 N 次读帧（从 1 计）失败
    fail_on_read: Option<u64>,
    reads: u64,
    opens: u32,
    releases: u32,
}

/// 模拟相机（共享句柄）
///
/// 每次读帧返回一个序号递增的 640x480 空白帧。
#[derive(Debug, Clone, Default)]
pub struct SimCamera {
    state: Arc<Mutex<CameraState>>,
}

impl SimCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开设备时失败
    pub fn failing_open() -> Self {
        let camera = Self::new();
        camera.state.lock().fail_open = true;
        camera
    }

    /// 第 `n` 次读帧（从 1 计）失败
    pub fn fail_on_read(&self, n: u64) {
        self.state.lock().fail_on_read = Some(n);
    }

    /// 读帧次数（含失败的那一次）
    pub fn reads(&self) -> u64 {
        self.state.lock().reads
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// `release` 被调用的次数
    pub fn release_count(&self) -> u32 {
        self.state.lock().releases
    }

    /// `open` 成功的次数
    pub fn open_count(&self) -> u32 {
        self.state.lock().opens
    }
}

impl FrameSource for SimCamera {
    fn open(&mut self) -> Result<(), FrameError> {
        let mut state = self.state.lock();
        if state.fail_open {
            return Err(FrameError::OpenFailed("no video device".to_string()));
        }
        state.open = true;
        state.opens += 1;
        Ok(())
    }

    fn read(&mut self) -> Result<Frame, FrameError> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(FrameError::NotOpen);
        }
        state.reads += 1;
        if state.fail_on_read == Some(state.reads) {
            return Err(FrameError::ReadFailed("device disconnected".to_string()));
        }
        Ok(Frame {
            sequence: state.reads,
            width: 640,
            height: 480,
            data: Vec::new(),
        })
    }

    fn release(&mut self) {
        let mut state = self.state.lock();
        state.open = false;
        state.releases += 1;
    }
}
