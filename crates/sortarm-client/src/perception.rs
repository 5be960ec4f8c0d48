//! 感知循环
//!
//! 每次迭代：
//!
//! 1. 等待就绪门打开（手臂空闲）
//! 2. 丢弃 `flush_frames` 帧缓存的旧帧，再读取一帧新帧
//! 3. 分类，按置信度阈值过滤
//! 4. 为合格的检测结果关门并派发分拣任务
//! 5. 延时 `loop_delay_ms`
//!
//! 取消只在迭代边界生效。无论以何种方式退出，相机都会被释放。

use crate::cancel::CancelToken;
use crate::context::ArmContext;
use crate::error::PerceptionError;
use crate::gate::{GateClaim, ReadyGate};
use crate::report::{Reporter, SorterStatus};
use crate::task::SortTask;
use serde::{Deserialize, Serialize};
use sortarm_hal::{Classifier, Frame, FrameSource};
use sortarm_protocol::{Detection, SortRecord};
use std::sync::Arc;
use std::time::Duration;

/// 同一帧出现多个合格检测结果时的派发策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// 每帧只派发第一个合格结果，其余丢弃
    #[default]
    OnePerFrame,
    /// 依次派发，每个都等待上一个任务打开就绪门
    Queue,
}

/// 感知循环配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// 置信度严格大于该值才派发
    pub confidence_threshold: f64,
    /// 每次采帧前丢弃的旧帧数
    pub flush_frames: u32,
    /// 迭代间延时（毫秒）
    pub loop_delay_ms: u64,
    /// 等待就绪门时检查取消标志的间隔（毫秒，最小 1）
    pub gate_poll_ms: u64,
    pub dispatch: DispatchPolicy,
    /// 最多迭代次数，`None` 表示直到取消
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u64>,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        PerceptionConfig {
            confidence_threshold: 0.5,
            flush_frames: 5,
            loop_delay_ms: 500,
            gate_poll_ms: 100,
            dispatch: DispatchPolicy::OnePerFrame,
            max_iterations: None,
        }
    }
}

/// 一次会话的统计
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSummary {
    /// 完成的迭代次数
    pub iterations: u64,
    /// 本次会话追加的分拣记录
    pub records: Vec<SortRecord>,
    /// 没有合格检测结果的迭代次数
    pub empty_frames: u64,
}

/// 感知循环
///
/// 独占帧源与分类器；手臂上下文以 `Arc` 共享给派发出的任务。
pub struct PerceptionLoop<S, C> {
    source: S,
    classifier: C,
    context: Arc<ArmContext>,
    gate: ReadyGate,
    reporter: Reporter,
    config: PerceptionConfig,
    summary: SessionSummary,
    next_task_id: u64,
}

impl<S: FrameSource, C: Classifier> PerceptionLoop<S, C> {
    pub fn new(
        source: S,
        classifier: C,
        context: Arc<ArmContext>,
        reporter: Reporter,
        config: PerceptionConfig,
    ) -> Self {
        PerceptionLoop {
            source,
            classifier,
            context,
            gate: ReadyGate::new(true),
            reporter,
            config,
            summary: SessionSummary::default(),
            next_task_id: 1,
        }
    }

    /// 就绪门句柄
    pub fn gate(&self) -> &ReadyGate {
        &self.gate
    }

    /// 已追加的分拣记录（只增不减）
    pub fn records(&self) -> &[SortRecord] {
        &self.summary.records
    }

    pub fn config(&self) -> &PerceptionConfig {
        &self.config
    }

    /// 运行直到取消、达到迭代上限或遇到致命错误
    ///
    /// # 错误
    ///
    /// - 相机无法打开：[`PerceptionError::CameraUnavailable`]
    /// - 新帧读取失败：[`PerceptionError::CaptureFailed`]
    pub fn run_while(&mut self, cancel: &CancelToken) -> Result<SessionSummary, PerceptionError> {
        if let Err(e) = self.source.open() {
            tracing::error!("Could not access the camera: {}", e);
            self.reporter.set_status(SorterStatus::CameraUnavailable);
            return Err(PerceptionError::CameraUnavailable(e));
        }
        tracing::info!("Perception loop started");
        self.reporter.set_status(SorterStatus::Running);

        let result = self.capture_loop(cancel);

        self.source.release();
        tracing::info!("Camera released after {} iteration(s)", self.summary.iterations);
        self.reporter.set_status(SorterStatus::CameraReleased);
        result.map(|()| self.summary.clone())
    }

    fn capture_loop(&mut self, cancel: &CancelToken) -> Result<(), PerceptionError> {
        let loop_delay = Duration::from_millis(self.config.loop_delay_ms);

        while !cancel.is_cancelled() {
            if !self.wait_ready(cancel) {
                break;
            }

            let frame = self.capture()?;
            let detections = self.classify(&frame);
            self.dispatch(detections, cancel);

            self.summary.iterations += 1;
            if self
                .config
                .max_iterations
                .is_some_and(|max| self.summary.iterations >= max)
            {
                tracing::debug!("Iteration limit reached");
                break;
            }
            self.context.sleeper.sleep(loop_delay);
        }
        Ok(())
    }

    fn gate_poll(&self) -> Duration {
        Duration::from_millis(self.config.gate_poll_ms.max(1))
    }

    /// 等待就绪门，期间被取消则返回 `false`
    fn wait_ready(&self, cancel: &CancelToken) -> bool {
        let poll = self.gate_poll();
        while !self.gate.wait_timeout(poll) {
            if cancel.is_cancelled() {
                return false;
            }
        }
        true
    }

    fn claim_gate(&self, cancel: &CancelToken) -> Option<GateClaim> {
        let poll = self.gate_poll();
        loop {
            if let Some(claim) = self.gate.claim_timeout(poll) {
                return Some(claim);
            }
            if cancel.is_cancelled() {
                return None;
            }
        }
    }

    fn capture(&mut self) -> Result<Frame, PerceptionError> {
        for _ in 0..self.config.flush_frames {
            if let Err(e) = self.source.read() {
                tracing::debug!("Stale frame read failed: {}", e);
            }
        }

        self.source.read().map_err(|e| {
            tracing::error!("Failed to capture frame: {}", e);
            self.reporter.set_status(SorterStatus::CaptureFailed);
            PerceptionError::CaptureFailed(e)
        })
    }

    fn classify(&mut self, frame: &Frame) -> Vec<Detection> {
        match self.classifier.classify(frame) {
            Ok(detections) => detections,
            Err(e) => {
                tracing::warn!(
                    "Classifier failed on frame {}: {}; treating as no detections",
                    frame.sequence,
                    e
                );
                Vec::new()
            },
        }
    }

    fn dispatch(&mut self, detections: Vec<Detection>, cancel: &CancelToken) {
        let threshold = self.config.confidence_threshold;
        let qualifying: Vec<Detection> =
            detections.into_iter().filter(|d| d.exceeds(threshold)).collect();

        if qualifying.is_empty() {
            self.summary.empty_frames += 1;
            self.reporter.set_status(SorterStatus::NoDetections);
            return;
        }

        let total = qualifying.len();
        for (index, detection) in qualifying.into_iter().enumerate() {
            if index > 0 && self.config.dispatch == DispatchPolicy::OnePerFrame {
                tracing::debug!("{} further detection(s) dropped this frame", total - index);
                break;
            }
            let Some(claim) = self.claim_gate(cancel) else {
                tracing::info!("Cancelled with {} detection(s) left undispatched", total - index);
                break;
            };
            self.spawn_task(&detection, claim);
        }
    }

    fn spawn_task(&mut self, detection: &Detection, claim: GateClaim) {
        let record = SortRecord::from_detection(detection);
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let task = SortTask::new(
            task_id,
            record.ripeness.is_ripe(),
            self.context.clone(),
            self.reporter.clone(),
        );
        let bin = task.bin();

        match task.spawn(claim) {
            Ok(_) => {
                tracing::info!("Dispatched task #{}: {}", task_id, record);
                self.reporter.record(record.clone());
                self.reporter.set_status(SorterStatus::Dispatched {
                    label: record.label.clone(),
                    bin,
                });
                self.summary.records.push(record);
            },
            Err(e) => tracing::error!("Failed to spawn sort task #{}: {}", task_id, e),
        }
    }
}
