//! # Sortarm Client
//!
//! 分拣流水线的协调层：
//!
//! - [`ReadyGate`]: 唯一的互斥原语，保证同一时刻最多一个手臂动作
//! - [`SortTask`]: 单个物体的 抓取 → 抬升 → 运送 → 释放 → 复位 状态机
//! - [`PerceptionLoop`]: 采帧、分类、过滤并派发分拣任务
//! - [`Reporter`] / [`StatusBoard`] / [`RecordLog`]: 对外的事件流、状态快照与分拣记录
//!
//! # 并发模型
//!
//! ```text
//! perception 线程 ── wait(gate) ── 采帧/分类 ── claim(gate) ── spawn ──┐
//!        ▲                                                             │
//!        └──────────────── set(gate)（GateClaim 析构）◄── sort-task 线程┘
//! ```
//!
//! 相机只属于感知线程；执行器句柄随 [`ArmContext`] 显式传入任务线程。

mod cancel;
mod context;
mod error;
mod gate;
pub mod perception;
pub mod report;
pub mod task;

pub use cancel::CancelToken;
pub use context::{ArmContext, CycleConfig};
pub use error::PerceptionError;
pub use gate::{GateClaim, ReadyGate};
pub use perception::{DispatchPolicy, PerceptionConfig, PerceptionLoop, SessionSummary};
pub use report::{RecordLog, Reporter, SortEvent, SorterStatus, StatusBoard, render_records};
pub use task::{SortOutcome, SortStage, SortTask};
