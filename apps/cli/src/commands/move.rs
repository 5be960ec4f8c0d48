//! 移动命令
//!
//! 把模拟臂移动到一个标定位姿，移动前显示目标角度并确认。

use crate::sim;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use sortarm_sdk::prelude::*;
use std::path::Path;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标位姿：home, lift, pickup, bin_a, bin_b
    pub pose: String,

    /// 运动时长（毫秒），默认取配置中的 cycle.move_duration_ms
    #[arg(short, long)]
    pub duration: Option<u32>,

    /// 跳过确认提示
    #[arg(short, long)]
    pub yes: bool,

    /// 按真实时序延时
    #[arg(long)]
    pub realtime: bool,
}

impl MoveCommand {
    pub fn parse_pose(&self) -> Result<NamedPose> {
        NamedPose::from_name(&self.pose).ok_or_else(|| {
            let known: Vec<&str> = NamedPose::ALL.iter().map(|p| p.name()).collect();
            anyhow!("Unknown pose '{}', expected one of: {}", self.pose, known.join(", "))
        })
    }

    pub fn execute(&self, config_path: &Path) -> Result<()> {
        let pose = self.parse_pose()?;
        let config = SorterConfig::load_or_default(config_path)?;
        config.validate()?;
        let target = config.poses.get(pose);
        let duration = self.duration.unwrap_or(config.cycle.move_duration_ms);

        println!("Target {}: {}", pose.name(), target);
        if !self.yes {
            let confirmed = inquire::Confirm::new("Move the arm?")
                .with_default(false)
                .prompt()
                .context("Confirmation prompt failed (use --yes in non-interactive shells)")?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        let sequencer = PoseSequencer::new(config.motion.clone(), sim::sleeper(self.realtime));
        let mut arm = sim::arm(None);
        sequencer.move_to(&mut arm, target, duration)?;

        for write in arm.writes() {
            println!("  {} <- {} ({}ms)", write.joint, write.angle, write.duration_ms);
        }
        println!("✅ Arm at {}", arm.pose());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(pose: &str) -> MoveCommand {
        MoveCommand {
            pose: pose.to_string(),
            duration: None,
            yes: true,
            realtime: false,
        }
    }

    #[test]
    fn test_parse_pose() {
        assert_eq!(command("bin_a").parse_pose().unwrap(), NamedPose::BinA);
        let err = command("shelf").parse_pose().unwrap_err();
        assert!(err.to_string().contains("home, lift, pickup, bin_a, bin_b"));
    }
}
