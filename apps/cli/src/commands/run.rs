//! 分拣会话命令
//!
//! 在模拟硬件上运行完整的感知循环，Ctrl-C 在当前迭代结束后停止。

use crate::sim;
use anyhow::{Context, Result};
use clap::Args;
use sortarm_sdk::hal::mock::SimCamera;
use sortarm_sdk::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 分拣会话参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 迭代次数上限（0 表示直到 Ctrl-C）
    #[arg(short = 'n', long, default_value_t = 4)]
    pub cycles: u64,

    /// 分类结果脚本（JSON 数组，每个元素是一次分类服务响应）
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// 同一帧的多个检测结果依次派发
    #[arg(long)]
    pub queue: bool,

    /// 模拟夹爪中物体的接触角（度）
    #[arg(long, default_value_t = 82.0)]
    pub object: f64,

    /// 按真实时序延时
    #[arg(long)]
    pub realtime: bool,
}

impl RunCommand {
    pub fn execute(&self, config_path: &Path) -> Result<()> {
        let config = SorterConfig::load_or_default(config_path)?;
        config.validate()?;

        let arm = sim::arm(Some(self.object));
        let context = config.build_context(arm_handle(arm.clone()), sim::sleeper(self.realtime))?;
        let mut perception = config.perception.clone();
        if self.cycles > 0 {
            perception.max_iterations = Some(self.cycles);
        }
        if self.queue {
            perception.dispatch = DispatchPolicy::Queue;
        }

        let mut session = SortController::start(
            SimCamera::new(),
            sim::classifier(self.script.as_deref())?,
            Arc::new(context),
            perception,
        )?;

        let cancel = session.cancel_token();
        ctrlc::set_handler(move || {
            println!("\n🛑 Stopping after the current iteration...");
            cancel.cancel();
        })
        .context("Failed to install Ctrl-C handler")?;

        loop {
            match session.next_event(Duration::from_millis(100)) {
                Some(event) => print_event(&event),
                None if !session.is_running() => break,
                None => {},
            }
        }

        let summary = session.wait()?;
        println!("{}", session.status());
        println!();
        println!("{}", session.records_text());
        println!();
        println!(
            "{} iteration(s), {} sorted, {} empty frame(s); arm at {}",
            summary.iterations,
            summary.records.len(),
            summary.empty_frames,
            arm.pose()
        );
        Ok(())
    }
}

fn print_event(event: &SortEvent) {
    match event {
        SortEvent::Status(status) => println!("[status] {}", status),
        SortEvent::Recorded(record) => println!("[record] {}", record),
        SortEvent::TaskStarted { task_id, bin } => println!("[task {}] start -> {}", task_id, bin),
        SortEvent::StageEntered { task_id, stage } => println!("[task {}] {}", task_id, stage),
        SortEvent::TaskFinished { task_id, outcome } => match outcome {
            SortOutcome::Done { grip } => {
                println!("[task {}] done, gripper closed at {}", task_id, grip.angle())
            },
            SortOutcome::Faulted { stage, error } => {
                println!("[task {}] ERROR at {}: {}", task_id, stage, error)
            },
        },
    }
}
