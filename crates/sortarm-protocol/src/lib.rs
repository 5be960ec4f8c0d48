//! # Sortarm Protocol
//!
//! 分拣机械臂的数据模型与分类器报文格式（无硬件依赖）
//!
//! ## 模块
//!
//! - `units`: 角度单位（`Deg`）
//! - `joint`: 关节 ID、关节位姿 `JointPose` 与标定位姿表 `PoseTable`
//! - `detection`: 检测结果、成熟度判定、分拣箱路由与分拣记录
//! - `classification`: 云端分类器 JSON 响应解析
//! - `error`: 协议层错误
//!
//! ## 约定
//!
//! - 关节 1-5 构成手臂位姿，关节 6 是夹爪
//! - 所有角度单位为度，标定位姿取整数值

pub mod classification;
pub mod detection;
pub mod error;
pub mod joint;
pub mod units;

// 重新导出常用类型
pub use classification::{decode_response, detections_from_value};
pub use detection::{Bin, Detection, Ripeness, SortRecord};
pub use error::ProtocolError;
pub use joint::{JointId, JointPose, NamedPose, PoseTable};
pub use units::Deg;
