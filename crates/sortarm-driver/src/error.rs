//! 驱动层错误类型定义

use thiserror::Error;

/// 驱动层错误类型
///
/// 执行器故障本身使用 `sortarm_hal::ActuatorError` 原样传播，这里只包含
/// 驱动层自己的配置错误。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// 参数无效
    #[error("Invalid parameter '{param}': {reason}")]
    InvalidParameter {
        /// 参数名
        param: &'static str,
        /// 原因
        reason: String,
    },
}

impl DriverError {
    pub(crate) fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = DriverError::invalid("max_attempts", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'max_attempts': must be at least 1"
        );
    }
}
