//! 夹爪命令

use crate::sim;
use anyhow::Result;
use clap::{Args, ValueEnum};
use sortarm_sdk::prelude::*;
use std::path::Path;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GripAction {
    Open,
    Close,
}

/// 夹爪命令参数
#[derive(Args, Debug)]
pub struct GripCommand {
    #[arg(value_enum)]
    pub action: GripAction,

    /// 模拟夹爪中物体的接触角（度），不指定则夹爪中没有物体
    #[arg(long)]
    pub object: Option<f64>,

    /// 闭合前夹爪的起始角度（度）
    #[arg(long, default_value_t = 60.0)]
    pub from: f64,

    /// 按真实时序延时
    #[arg(long)]
    pub realtime: bool,
}

impl GripCommand {
    pub fn execute(&self, config_path: &Path) -> Result<()> {
        let config = SorterConfig::load_or_default(config_path)?;
        let grip = GripController::new(config.grip, sim::sleeper(self.realtime))?;
        let mut arm = sim::arm(self.object);
        arm.set_angle(JointId::Gripper, Deg(self.from));

        let outcome = grip.clamp(&mut arm, self.action == GripAction::Close)?;

        match outcome {
            GripOutcome::Opened { angle } => println!("✅ Gripper opened to {}", angle),
            GripOutcome::GripDetected { angle, attempt } => {
                println!("✅ Grip detected at {} (attempt {})", angle, attempt)
            },
            GripOutcome::MaxAttemptsReached { angle, attempts } => println!(
                "⚠️  No stall after {} attempts, gripper at {}",
                attempts, angle
            ),
        }
        println!("  {} write(s) to {}", arm.writes_to(JointId::Gripper).len(), JointId::Gripper);
        Ok(())
    }
}
