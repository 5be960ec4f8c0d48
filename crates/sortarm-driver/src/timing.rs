//! 延时抽象
//!
//! 舵机写入没有到位确认，所有"等待到位"都靠延时完成。延时经由
//! [`Sleeper`] 注入：
//!
//! - [`SpinSleeper`]: 真实硬件使用，`spin_sleep` 低抖动延时
//! - [`NoSleep`]: 模拟硬件使用，立即返回
//! - [`RecordingSleeper`]: 测试使用，只记录请求的时长

use parking_lot::Mutex;
use std::fmt;
use std::time::Duration;

/// 延时器
pub trait Sleeper: Send + Sync + fmt::Debug {
    fn sleep(&self, duration: Duration);
}

/// 基于 `spin_sleep` 的精确延时
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinSleeper;

impl Sleeper for SpinSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            spin_sleep::sleep(duration);
        }
    }
}

/// 不延时
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// 记录延时请求而不真正等待
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按顺序返回所有请求
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().clone()
    }

    /// 请求时长之和
    pub fn total(&self) -> Duration {
        self.calls.lock().iter().sum()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.calls.lock().push(duration);
    }
}
