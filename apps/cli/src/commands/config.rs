//! 配置管理命令

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use sortarm_sdk::SorterConfig;
use std::path::Path;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 写入默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },

    /// 显示生效的配置
    Show,

    /// 检查配置文件
    Check,

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Init { force } => Self::init_(path, force),
            ConfigCommand::Show => Self::show_(path),
            ConfigCommand::Check => Self::check_(path),
            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }

    fn init_(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", path.display());
        }
        SorterConfig::default().save_to_file(path)?;
        println!("✅ Wrote default config to {}", path.display());
        Ok(())
    }

    fn show_(path: &Path) -> Result<()> {
        let config = SorterConfig::load_or_default(path)?;
        let text = toml::to_string_pretty(&config).context("Failed to render config")?;
        println!("# {}", path.display());
        print!("{}", text);
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        if !path.exists() {
            println!("⚠️  {} not found, defaults will be used", path.display());
        }
        let config = SorterConfig::load_or_default(path)?;
        config.validate()?;
        println!("✅ Config OK");
        println!("  Poses:");
        for (pose, angles) in config.poses.iter() {
            println!("    {:<7} {}", pose.name(), angles);
        }
        println!(
            "  Grip: step {}, max {} attempts, {} stall confirmations",
            config.grip.step, config.grip.max_attempts, config.grip.stall_confirmations
        );
        println!(
            "  Perception: threshold {}, dispatch {:?}",
            config.perception.confidence_threshold, config.perception.dispatch
        );
        Ok(())
    }
}
