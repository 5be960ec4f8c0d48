//! 协议层错误

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// 响应正文不是合法 JSON
    #[error("Invalid classifier response: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// JSON 结构与约定不符
    #[error("Unexpected classifier response shape: {0}")]
    UnexpectedShape(String),
}
