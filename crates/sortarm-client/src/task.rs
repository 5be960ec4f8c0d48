//! 分拣任务状态机
//!
//! 单个物体的完整分拣流程：
//!
//! ```text
//! OpenGripper → Home → Lift → DescendPickup → Grasp → LiftWithObject
//!     → Transport(bin) → Release → ReturnHome → Done
//! ```
//!
//! 任一阶段执行器出错即进入 [`SortOutcome::Faulted`]，剩余阶段跳过。
//! 无论哪种结局，任务结束时都会打开就绪门。

use crate::context::ArmContext;
use crate::gate::GateClaim;
use crate::report::{Reporter, SortEvent};
use sortarm_driver::GripOutcome;
use sortarm_hal::{ActuatorError, JointActuator};
use sortarm_protocol::{Bin, NamedPose};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// 分拣阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortStage {
    OpenGripper,
    Home,
    Lift,
    DescendPickup,
    Grasp,
    LiftWithObject,
    Transport(Bin),
    Release,
    ReturnHome,
}

/// 阶段对应的动作
enum Action {
    Grip { close: bool },
    Move { pose: NamedPose, dwell: bool },
}

impl SortStage {
    /// 送往 `bin` 的完整阶段序列
    pub fn sequence(bin: Bin) -> [SortStage; 9] {
        [
            SortStage::OpenGripper,
            SortStage::Home,
            SortStage::Lift,
            SortStage::DescendPickup,
            SortStage::Grasp,
            SortStage::LiftWithObject,
            SortStage::Transport(bin),
            SortStage::Release,
            SortStage::ReturnHome,
        ]
    }

    fn action(self) -> Action {
        match self {
            SortStage::OpenGripper | SortStage::Release => Action::Grip { close: false },
            SortStage::Grasp => Action::Grip { close: true },
            SortStage::Home | SortStage::ReturnHome => Action::Move {
                pose: NamedPose::Home,
                dwell: true,
            },
            SortStage::Lift | SortStage::LiftWithObject => Action::Move {
                pose: NamedPose::Lift,
                dwell: false,
            },
            SortStage::DescendPickup => Action::Move {
                pose: NamedPose::Pickup,
                dwell: false,
            },
            SortStage::Transport(Bin::A) => Action::Move {
                pose: NamedPose::BinA,
                dwell: false,
            },
            SortStage::Transport(Bin::B) => Action::Move {
                pose: NamedPose::BinB,
                dwell: false,
            },
        }
    }
}

impl fmt::Display for SortStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortStage::OpenGripper => write!(f, "OPEN_GRIPPER"),
            SortStage::Home => write!(f, "HOME"),
            SortStage::Lift => write!(f, "LIFT"),
            SortStage::DescendPickup => write!(f, "DESCEND_PICKUP"),
            SortStage::Grasp => write!(f, "GRASP"),
            SortStage::LiftWithObject => write!(f, "LIFT_WITH_OBJECT"),
            SortStage::Transport(bin) => write!(f, "TRANSPORT_{}", bin),
            SortStage::Release => write!(f, "RELEASE"),
            SortStage::ReturnHome => write!(f, "RETURN_HOME"),
        }
    }
}

/// 任务结局
#[derive(Debug, Clone, PartialEq)]
pub enum SortOutcome {
    /// 全部阶段完成，附带夹取结果
    Done { grip: GripOutcome },
    /// 在 `stage` 阶段因执行器错误中止
    Faulted { stage: SortStage, error: ActuatorError },
}

impl SortOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, SortOutcome::Done { .. })
    }
}

/// 分拣任务
#[derive(Debug)]
pub struct SortTask {
    id: u64,
    bin: Bin,
    context: Arc<ArmContext>,
    reporter: Reporter,
}

impl SortTask {
    pub fn new(id: u64, is_ripe: bool, context: Arc<ArmContext>, reporter: Reporter) -> Self {
        SortTask {
            id,
            bin: Bin::for_ripe(is_ripe),
            context,
            reporter,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn bin(&self) -> Bin {
        self.bin
    }

    /// 在当前线程执行任务
    ///
    /// `claim` 在返回前释放（panic 时由析构释放）。
    pub fn run(self, claim: GateClaim) -> SortOutcome {
        self.reporter.emit(SortEvent::TaskStarted {
            task_id: self.id,
            bin: self.bin,
        });
        tracing::info!("Sort task #{} started, destination {}", self.id, self.bin);

        let outcome = match self.execute() {
            Ok(grip) => {
                tracing::info!(
                    "Sort task #{} done, gripper closed at {}{}",
                    self.id,
                    grip.angle(),
                    if grip.is_degraded() { " (no stall detected)" } else { "" }
                );
                SortOutcome::Done { grip }
            },
            Err((stage, error)) => {
                tracing::error!("Sort task #{} aborted at {}: {}", self.id, stage, error);
                SortOutcome::Faulted { stage, error }
            },
        };

        self.reporter.emit(SortEvent::TaskFinished {
            task_id: self.id,
            outcome: outcome.clone(),
        });
        claim.release();
        outcome
    }

    /// 在独立线程执行任务
    ///
    /// 线程创建失败时 `claim` 随闭包一起析构，就绪门重新打开。
    pub fn spawn(self, claim: GateClaim) -> io::Result<JoinHandle<SortOutcome>> {
        thread::Builder::new()
            .name(format!("sort-task-{}", self.id))
            .spawn(move || self.run(claim))
    }

    fn execute(&self) -> Result<GripOutcome, (SortStage, ActuatorError)> {
        let ctx = &self.context;
        let mut guard = ctx.arm.lock();
        let arm: &mut dyn JointActuator = &mut **guard;
        let mut grasp = None;

        for stage in SortStage::sequence(self.bin) {
            self.reporter.emit(SortEvent::StageEntered {
                task_id: self.id,
                stage,
            });
            tracing::debug!("Sort task #{} entering {}", self.id, stage);

            match stage.action() {
                Action::Grip { close } => {
                    let outcome = ctx.gripper.clamp(arm, close).map_err(|e| (stage, e))?;
                    if stage == SortStage::Grasp {
                        grasp = Some(outcome);
                    }
                },
                Action::Move { pose, dwell } => {
                    ctx.sequencer
                        .move_to(arm, ctx.poses.get(pose), ctx.cycle.move_duration_ms)
                        .map_err(|e| (stage, e))?;
                    if dwell {
                        ctx.sleeper.sleep(ctx.home_dwell());
                    }
                },
            }
        }

        // Grasp 阶段总在序列中，走到这里一定有值
        grasp.ok_or_else(|| {
            (
                SortStage::Grasp,
                ActuatorError::BusUnavailable("grasp stage was not executed".to_string()),
            )
        })
    }
}
