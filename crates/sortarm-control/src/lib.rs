//! # Sortarm Control
//!
//! 会话级控制：
//!
//! - [`SorterConfig`]: TOML 配置（位姿表、运动时序、夹爪、周期、感知）
//! - [`SortController`]: 启动/停止感知循环，查询状态与分拣记录

pub mod config;
pub mod controller;

pub use config::SorterConfig;
pub use controller::{ControlError, SortController};
