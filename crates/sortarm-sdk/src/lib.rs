//! Sortarm SDK - 视觉引导的水果分拣机械臂
//!
//! 6 舵机机械臂（5 轴 + 夹爪）配合相机与远程分类服务，把检测到的水果按成熟度
//! 放入两个分拣箱。
//!
//! # 架构设计
//!
//! 从底层到高层：
//!
//! - **协议层** (`protocol`): 关节、位姿、检测结果与路由规则
//! - **硬件抽象层** (`hal`): 执行器、帧源、分类器 trait
//! - **驱动层** (`driver`): 位姿序列执行、自适应夹取
//! - **客户端层** (`client`): 就绪门、分拣任务状态机、感知循环
//! - **控制层** (`control`): 配置文件与会话控制
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use sortarm_sdk::prelude::*;
//!
//! let config = SorterConfig::load_or_default(&SorterConfig::default_path()?)?;
//! let context = config.build_context(arm_handle(servo_bus), Arc::new(SpinSleeper))?;
//! let mut session =
//!     SortController::start(camera, classifier, Arc::new(context), config.perception)?;
//! // ...
//! session.stop()?;
//! ```

pub mod logging;
pub mod prelude;

pub use sortarm_client as client;
pub use sortarm_control as control;
pub use sortarm_driver as driver;
pub use sortarm_hal as hal;
pub use sortarm_protocol as protocol;

pub use logging::init_logging;

pub use sortarm_client::{ArmContext, PerceptionLoop, ReadyGate, SortTask};
pub use sortarm_control::{SortController, SorterConfig};
pub use sortarm_driver::{GripController, PoseSequencer};
