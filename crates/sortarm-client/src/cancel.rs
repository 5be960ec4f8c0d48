//! 协作式取消标志

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 取消标志
///
/// 感知循环只在迭代边界检查；已派发的分拣任务不会被中断。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
