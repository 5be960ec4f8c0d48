//! Mock 硬件
//!
//! 用于测试与演示的模拟舵机臂、相机和分类器。所有模拟对象都是共享句柄
//! （`Clone` 后指向同一份状态），测试可以在把对象交给被测代码之后继续
//! 注入故障或检查记录。

mod arm;
mod camera;
mod classifier;

pub use arm::{ArmFault, ServoWrite, SimArm};
pub use camera::SimCamera;
pub use classifier::ScriptedClassifier;
