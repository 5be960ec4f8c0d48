//! 命令定义和实现

pub mod classify;
pub mod config;
pub mod grip;
pub mod r#move;
pub mod run;

pub use classify::ClassifyCommand;
pub use config::ConfigCommand;
pub use grip::GripCommand;
pub use r#move::MoveCommand;
pub use run::RunCommand;
