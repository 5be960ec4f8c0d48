//! 分拣会话控制
//!
//! [`SortController`] 在后台线程运行感知循环，并提供：
//!
//! - 启动 / 停止（停止只在迭代边界生效，已派发的任务会跑完）
//! - 状态快照与分拣记录（随时可读，不需要先取事件）
//! - 事件流（有界，来不及取走的事件被丢弃）

use crossbeam_channel::Receiver;
use sortarm_client::{
    ArmContext, CancelToken, PerceptionConfig, PerceptionError, PerceptionLoop, ReadyGate,
    RecordLog, Reporter, SessionSummary, SortEvent, SorterStatus, StatusBoard,
};
use sortarm_hal::{Classifier, FrameSource};
use sortarm_protocol::SortRecord;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// 停止时等待在途任务完成的上限
const TASK_DRAIN_TIMEOUT: Duration = Duration::from_secs(60);

/// 会话控制错误
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("Sorting session is not running")]
    NotRunning,

    #[error("Failed to spawn perception thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Perception thread panicked")]
    LoopPanicked,

    #[error(transparent)]
    Perception(#[from] PerceptionError),
}

type LoopHandle = JoinHandle<Result<SessionSummary, PerceptionError>>;

/// 分拣会话控制器
pub struct SortController {
    handle: Option<LoopHandle>,
    cancel: CancelToken,
    status: StatusBoard,
    gate: ReadyGate,
    events: Receiver<SortEvent>,
    records: RecordLog,
}

impl SortController {
    /// 启动感知循环
    ///
    /// 帧源与分类器移交给后台线程独占。
    pub fn start<S, C>(
        source: S,
        classifier: C,
        context: Arc<ArmContext>,
        config: PerceptionConfig,
    ) -> Result<Self, ControlError>
    where
        S: FrameSource + 'static,
        C: Classifier + 'static,
    {
        let status = StatusBoard::new(SorterStatus::Ready);
        let (reporter, events) = Reporter::with_channel(status.clone());
        let records = reporter.records().clone();
        let mut perception = PerceptionLoop::new(source, classifier, context, reporter, config);
        let gate = perception.gate().clone();
        let cancel = CancelToken::new();

        let handle = {
            let cancel = cancel.clone();
            thread::Builder::new()
                .name("perception".to_string())
                .spawn(move || perception.run_while(&cancel))
                .map_err(ControlError::Spawn)?
        };
        tracing::info!("Sorting session started");

        Ok(SortController {
            handle: Some(handle),
            cancel,
            status,
            gate,
            events,
            records,
        })
    }

    /// 请求停止并等待循环退出
    pub fn stop(&mut self) -> Result<SessionSummary, ControlError> {
        self.cancel.cancel();
        self.finish()
    }

    /// 等待循环自行结束（达到迭代上限或出错）
    pub fn wait(&mut self) -> Result<SessionSummary, ControlError> {
        self.finish()
    }

    /// 取消标志，可交给信号处理函数
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn status(&self) -> SorterStatus {
        self.status.current()
    }

    pub fn gate(&self) -> &ReadyGate {
        &self.gate
    }

    /// 取走目前为止到达的事件
    pub fn poll_events(&self) -> Vec<SortEvent> {
        self.events.try_iter().collect()
    }

    /// 阻塞等待下一个事件
    pub fn next_event(&self, timeout: Duration) -> Option<SortEvent> {
        self.events.recv_timeout(timeout).ok()
    }

    /// 本次会话已派发的分拣记录
    pub fn records(&self) -> Vec<SortRecord> {
        self.records.snapshot()
    }

    /// 分拣记录的文本形式
    pub fn records_text(&self) -> String {
        self.records.render()
    }

    fn finish(&mut self) -> Result<SessionSummary, ControlError> {
        let handle = self.handle.take().ok_or(ControlError::NotRunning)?;
        let result = handle.join().map_err(|_| ControlError::LoopPanicked)?;

        if !self.gate.wait_timeout(TASK_DRAIN_TIMEOUT) {
            tracing::warn!("Sort task still running after {:?}", TASK_DRAIN_TIMEOUT);
        }

        let summary = result?;
        self.status.set(SorterStatus::Stopped);
        tracing::info!(
            "Sorting session stopped: {} iteration(s), {} record(s)",
            summary.iterations,
            summary.records.len()
        );
        Ok(summary)
    }
}

impl Drop for SortController {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortarm_driver::{NoSleep, arm_handle};
    use sortarm_hal::mock::{SimArm, SimCamera, ScriptedClassifier};
    use sortarm_protocol::{Deg, Detection};

    fn context(arm: &SimArm) -> Arc<ArmContext> {
        Arc::new(ArmContext::with_defaults(arm_handle(arm.clone()), Arc::new(NoSleep)).unwrap())
    }

    fn fast() -> PerceptionConfig {
        PerceptionConfig {
            loop_delay_ms: 0,
            gate_poll_ms: 5,
            ..PerceptionConfig::default()
        }
    }

    #[test]
    fn test_start_and_stop() {
        let arm = SimArm::new().with_object(Deg(82.0));
        let camera = SimCamera::new();
        let mut controller =
            SortController::start(camera.clone(), ScriptedClassifier::new(), context(&arm), fast())
                .unwrap();

        thread::sleep(Duration::from_millis(20));
        let summary = controller.stop().unwrap();

        assert!(!controller.is_running());
        assert_eq!(controller.status(), SorterStatus::Stopped);
        assert_eq!(controller.status().to_string(), "Sorting Stopped");
        assert_eq!(summary.records.len(), 0);
        assert_eq!(camera.release_count(), 1);
        assert!(matches!(controller.stop(), Err(ControlError::NotRunning)));
    }

    #[test]
    fn test_records_collected_from_events() {
        let arm = SimArm::new().with_object(Deg(82.0));
        let classifier = ScriptedClassifier::new();
        classifier
            .push_detections(vec![Detection::new("ripe_mango", 0.92)])
            .push_detections(vec![Detection::new("rotten_mango", 0.75)]);
        let config = PerceptionConfig {
            max_iterations: Some(2),
            ..fast()
        };
        let mut controller =
            SortController::start(SimCamera::new(), classifier, context(&arm), config).unwrap();

        let summary = controller.wait().unwrap();

        assert_eq!(controller.records(), summary.records);
        assert_eq!(
            controller.records_text(),
            "Fruit: ripe_mango, Confidence: 0.92, Bin: YELLOW (Ripe)\n\
             Fruit: rotten_mango, Confidence: 0.75, Bin: RED (Unripe/Rotten)"
        );
        assert!(controller.gate().is_set());
    }

    #[test]
    fn test_camera_failure_surfaces_on_wait() {
        let arm = SimArm::new();
        let mut controller = SortController::start(
            SimCamera::failing_open(),
            ScriptedClassifier::new(),
            context(&arm),
            fast(),
        )
        .unwrap();

        let err = controller.wait().unwrap_err();

        assert!(matches!(
            err,
            ControlError::Perception(PerceptionError::CameraUnavailable(_))
        ));
        assert_eq!(controller.status(), SorterStatus::CameraUnavailable);
        assert!(controller.records().is_empty());
    }

    #[test]
    fn test_records_visible_without_polling() {
        let arm = SimArm::new().with_object(Deg(82.0));
        let classifier = ScriptedClassifier::new();
        classifier.push_detections(vec![Detection::new("ripe_apple", 0.92)]);
        let mut controller =
            SortController::start(SimCamera::new(), classifier, context(&arm), fast()).unwrap();

        let mut text = controller.records_text();
        for _ in 0..200 {
            if controller.records().len() == 1 {
                text = controller.records_text();
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(text, "Fruit: ripe_apple, Confidence: 0.92, Bin: YELLOW (Ripe)");

        // 会话持续空转，事件从未被取走，通道不超过容量
        thread::sleep(Duration::from_millis(50));
        assert!(controller.is_running());
        assert!(controller.poll_events().len() <= Reporter::EVENT_CAPACITY);

        controller.stop().unwrap();
        assert_eq!(controller.records().len(), 1);
    }
}
