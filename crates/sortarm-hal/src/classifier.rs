//! 基于 JSON 响应的分类器适配
//!
//! 把"发送一帧、拿回响应正文"的传输层与响应解析拆开：传输层只需实现
//! [`ClassifierTransport`]，解析统一走 `sortarm_protocol::decode_response`。

use crate::error::ClassifierError;
use crate::{Classifier, Frame};
use sortarm_protocol::{Detection, decode_response};

/// 分类服务传输层
pub trait ClassifierTransport: Send {
    /// 提交一帧，返回响应正文
    fn infer(&mut self, frame: &Frame) -> Result<String, ClassifierError>;
}

/// 解析 JSON 响应的分类器
pub struct JsonClassifier<T> {
    transport: T,
}

impl<T: ClassifierTransport> JsonClassifier<T> {
    pub fn new(transport: T) -> Self {
        JsonClassifier { transport }
    }

    /// 取回传输层
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T: ClassifierTransport> Classifier for JsonClassifier<T> {
    fn classify(&mut self, frame: &Frame) -> Result<Vec<Detection>, ClassifierError> {
        let body = self.transport.infer(frame)?;
        let detections = decode_response(&body)?;
        tracing::debug!(
            "Frame #{} classified: {} detection(s)",
            frame.sequence,
            detections.len()
        );
        Ok(detections)
    }
}
