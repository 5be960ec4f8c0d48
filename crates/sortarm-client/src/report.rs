//! 状态与事件上报
//!
//! - [`StatusBoard`]: 最新状态快照（`ArcSwap`，读取无锁）
//! - [`RecordLog`]: 派发时追加的分拣记录，随时可读
//! - [`SortEvent`]: 通过有界 crossbeam 通道推送给观察者（CLI、测试）
//!
//! 观察者不存在、已断开或来不及取走时，事件直接丢弃，不影响分拣流程。
//! 状态快照与记录日志不依赖事件通道。

use crate::task::{SortOutcome, SortStage};
use arc_swap::ArcSwap;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use sortarm_protocol::{Bin, SortRecord};
use std::fmt;
use std::sync::Arc;

/// 分拣系统状态
#[derive(Debug, Clone, PartialEq)]
pub enum SorterStatus {
    Ready,
    Running,
    /// 已派发一个分拣任务
    Dispatched { label: String, bin: Bin },
    NoDetections,
    CameraUnavailable,
    CaptureFailed,
    CameraReleased,
    Stopped,
}

impl fmt::Display for SorterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SorterStatus::Ready => write!(f, "Sorting System Ready"),
            SorterStatus::Running => write!(f, "Sorting in Progress..."),
            SorterStatus::Dispatched { label, bin } => write!(f, "Sorting {} into {}", label, bin),
            SorterStatus::NoDetections => write!(f, "No fruits detected. Try again!"),
            SorterStatus::CameraUnavailable => write!(f, "Error: Could not access the camera."),
            SorterStatus::CaptureFailed => write!(f, "Error: Failed to capture frame."),
            SorterStatus::CameraReleased => write!(f, "Camera released."),
            SorterStatus::Stopped => write!(f, "Sorting Stopped"),
        }
    }
}

/// 分拣事件
#[derive(Debug, Clone, PartialEq)]
pub enum SortEvent {
    Status(SorterStatus),
    /// 派发时追加的分拣记录
    Recorded(SortRecord),
    TaskStarted { task_id: u64, bin: Bin },
    StageEntered { task_id: u64, stage: SortStage },
    /// 在就绪门重新打开之前发出
    TaskFinished { task_id: u64, outcome: SortOutcome },
}

/// 状态快照（共享句柄）
#[derive(Debug, Clone)]
pub struct StatusBoard {
    current: Arc<ArcSwap<SorterStatus>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(SorterStatus::Ready)
    }
}

impl StatusBoard {
    pub fn new(initial: SorterStatus) -> Self {
        StatusBoard {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// 当前状态（无锁读取）
    pub fn current(&self) -> SorterStatus {
        self.current.load().as_ref().clone()
    }

    pub fn set(&self, status: SorterStatus) {
        self.current.store(Arc::new(status));
    }
}

/// 分拣记录日志（共享句柄，只增不减）
#[derive(Debug, Clone, Default)]
pub struct RecordLog {
    entries: Arc<RwLock<Vec<SortRecord>>>,
}

impl RecordLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: SortRecord) {
        self.entries.write().push(record);
    }

    /// 当前全部记录的副本
    pub fn snapshot(&self) -> Vec<SortRecord> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// 见 [`render_records`]
    pub fn render(&self) -> String {
        render_records(&self.entries.read())
    }
}

/// 上报器
///
/// 感知循环与分拣任务各持一份克隆。
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    status: StatusBoard,
    records: RecordLog,
    events: Option<Sender<SortEvent>>,
}

impl Reporter {
    /// 事件通道容量
    pub const EVENT_CAPACITY: usize = 1024;

    /// 只更新状态快照与记录日志，不推送事件
    pub fn new(status: StatusBoard) -> Self {
        Reporter {
            status,
            records: RecordLog::new(),
            events: None,
        }
    }

    /// 创建带事件通道的上报器
    ///
    /// 通道容量为 [`Reporter::EVENT_CAPACITY`]，满了之后的新事件被丢弃。
    pub fn with_channel(status: StatusBoard) -> (Self, Receiver<SortEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(Self::EVENT_CAPACITY);
        (
            Reporter {
                status,
                records: RecordLog::new(),
                events: Some(tx),
            },
            rx,
        )
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn records(&self) -> &RecordLog {
        &self.records
    }

    /// 追加分拣记录并推送 [`SortEvent::Recorded`]
    pub fn record(&self, record: SortRecord) {
        self.records.push(record.clone());
        self.emit(SortEvent::Recorded(record));
    }

    /// 更新状态并推送 [`SortEvent::Status`]
    pub fn set_status(&self, status: SorterStatus) {
        tracing::debug!("Status: {}", status);
        self.status.set(status.clone());
        self.emit(SortEvent::Status(status));
    }

    pub fn emit(&self, event: SortEvent) {
        let Some(tx) = &self.events else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {},
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Event channel full, event discarded");
            },
            Err(TrySendError::Disconnected(_)) => {
                tracing::trace!("Event receiver dropped, event discarded");
            },
        }
    }
}

/// 把分拣记录渲染为逐行文本
pub fn render_records(records: &[SortRecord]) -> String {
    if records.is_empty() {
        return "Sorted Fruits will appear here".to_string();
    }
    records
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
