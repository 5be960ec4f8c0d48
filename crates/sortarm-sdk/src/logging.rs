//! 日志初始化
//!
//! 使用 `tracing-subscriber` 输出到 stderr，`RUST_LOG` 覆盖默认过滤规则；
//! 依赖 `log` 宏的第三方库通过 `tracing-log` 桥接进来。

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// 默认过滤规则
pub const DEFAULT_DIRECTIVE: &str = "sortarm=info";

/// 日志初始化错误
#[derive(Debug, Error)]
#[error("Failed to initialize logging: {0}")]
pub struct LoggingError(String);

/// 以 [`DEFAULT_DIRECTIVE`] 初始化全局日志
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with(DEFAULT_DIRECTIVE)
}

/// 以指定的默认过滤规则初始化全局日志
///
/// 只能成功调用一次；重复调用返回错误。
pub fn init_logging_with(default_directive: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| LoggingError(e.to_string()))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LoggingError(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| LoggingError(e.to_string()))?;

    log::debug!("log bridge installed");
    Ok(())
}
