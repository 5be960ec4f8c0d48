//! 就绪门（Ready Gate）
//!
//! 整个系统唯一的互斥原语：门打开表示手臂空闲，可以接受下一个分拣任务。
//!
//! - 感知循环在派发任务前 [`ReadyGate::claim`]，原子地把门关上
//! - 得到的 [`GateClaim`] 随任务一起转移到任务线程
//! - 任务无论成功、失败还是 panic，`GateClaim` 析构时都会重新打开门
//!
//! 门只会被持有 `GateClaim` 的一方打开，且每个 `GateClaim` 只打开一次。
//! 句柄本身不提供打开或关闭门的方法：
//!
//! ```compile_fail
//! use sortarm_client::ReadyGate;
//!
//! let gate = ReadyGate::new(true);
//! let _claim = gate.claim();
//! gate.set();
//! ```

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct GateInner {
    ready: Mutex<bool>,
    changed: Condvar,
}

/// 就绪门（共享句柄）
#[derive(Debug, Clone)]
pub struct ReadyGate {
    inner: Arc<GateInner>,
}

impl Default for ReadyGate {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ReadyGate {
    /// 创建就绪门，`ready` 为初始状态
    pub fn new(ready: bool) -> Self {
        ReadyGate {
            inner: Arc::new(GateInner {
                ready: Mutex::new(ready),
                changed: Condvar::new(),
            }),
        }
    }

    /// 打开门并唤醒所有等待者
    ///
    /// 只由 [`GateClaim`] 调用。
    fn set(&self) {
        let mut ready = self.inner.ready.lock();
        *ready = true;
        self.inner.changed.notify_all();
    }

    pub fn is_set(&self) -> bool {
        *self.inner.ready.lock()
    }

    /// 阻塞直到门打开
    pub fn wait(&self) {
        let mut ready = self.inner.ready.lock();
        while !*ready {
            self.inner.changed.wait(&mut ready);
        }
    }

    /// 最多等待 `timeout`，返回门是否已打开
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut ready = self.inner.ready.lock();
        while !*ready {
            if self.inner.changed.wait_until(&mut ready, deadline).timed_out() {
                return *ready;
            }
        }
        true
    }

    /// 门打开时立即关门并返回凭证，否则返回 `None`
    pub fn try_claim(&self) -> Option<GateClaim> {
        let mut ready = self.inner.ready.lock();
        if *ready {
            *ready = false;
            Some(GateClaim::new(self.clone()))
        } else {
            None
        }
    }

    /// 阻塞直到门打开，然后关门并返回凭证
    pub fn claim(&self) -> GateClaim {
        let mut ready = self.inner.ready.lock();
        while !*ready {
            self.inner.changed.wait(&mut ready);
        }
        *ready = false;
        GateClaim::new(self.clone())
    }

    /// 最多等待 `timeout` 获取凭证
    pub fn claim_timeout(&self, timeout: Duration) -> Option<GateClaim> {
        let deadline = Instant::now() + timeout;
        let mut ready = self.inner.ready.lock();
        while !*ready {
            if self.inner.changed.wait_until(&mut ready, deadline).timed_out() && !*ready {
                return None;
            }
        }
        *ready = false;
        Some(GateClaim::new(self.clone()))
    }
}

/// 持有手臂的凭证
///
/// 调用 [`GateClaim::release`] 或析构时打开就绪门，二者只生效一次。
#[derive(Debug)]
#[must_use = "dropping a GateClaim immediately reopens the gate"]
pub struct GateClaim {
    gate: Option<ReadyGate>,
}

impl GateClaim {
    fn new(gate: ReadyGate) -> Self {
        GateClaim { gate: Some(gate) }
    }

    /// 显式打开就绪门
    pub fn release(mut self) {
        self.open_gate();
    }

    fn open_gate(&mut self) {
        if let Some(gate) = self.gate.take() {
            gate.set();
        }
    }
}

impl Drop for GateClaim {
    fn drop(&mut self) {
        self.open_gate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_claim_closes_and_release_reopens() {
        let gate = ReadyGate::new(true);

        let claim = gate.try_claim().unwrap();
        assert!(!gate.is_set());
        assert!(gate.try_claim().is_none());

        claim.release();
        assert!(gate.is_set());
    }

    #[test]
    fn test_drop_reopens_gate() {
        let gate = ReadyGate::new(true);
        {
            let _claim = gate.claim();
            assert!(!gate.is_set());
        }
        assert!(gate.is_set());
    }

    #[test]
    fn test_panicking_holder_reopens_gate() {
        let gate = ReadyGate::new(true);
        let claim = gate.claim();

        let result = thread::spawn(move || {
            let _claim = claim;
            panic!("task failed");
        })
        .join();

        assert!(result.is_err());
        assert!(gate.is_set());
    }

    #[test]
    fn test_wait_timeout() {
        let gate = ReadyGate::new(false);
        assert!(!gate.wait_timeout(Duration::from_millis(20)));
        assert!(gate.claim_timeout(Duration::from_millis(20)).is_none());

        gate.set();
        assert!(gate.wait_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn test_waiter_wakes_on_release() {
        let gate = ReadyGate::new(true);
        let claim = gate.claim();

        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || {
                gate.wait();
                gate.is_set()
            })
        };

        thread::sleep(Duration::from_millis(20));
        drop(claim);
        assert!(waiter.join().unwrap());
    }

    #[test]
    fn test_claims_are_mutually_exclusive() {
        let gate = ReadyGate::new(true);
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let gate = gate.clone();
                let inside = inside.clone();
                let max_seen = max_seen.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        let claim = gate.claim();
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        inside.fetch_sub(1, Ordering::SeqCst);
                        claim.release();
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(gate.is_set());
    }
}
