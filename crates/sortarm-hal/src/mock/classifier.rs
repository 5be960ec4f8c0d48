//! 脚本化分类器
//!
//! 按顺序回放预先排好的结果，队列耗尽后返回空结果。

use crate::error::ClassifierError;
use crate::{Classifier, Frame};
use parking_lot::Mutex;
use sortarm_protocol::{Detection, decode_response};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug)]
enum Reply {
    Detections(Vec<Detection>),
    Body(String),
    Error(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<Reply>,
    calls: usize,
}

/// 脚本化分类器（共享句柄）
#[derive(Debug, Clone, Default)]
pub struct ScriptedClassifier {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一次返回的检测结果
    pub fn push_detections(&self, detections: Vec<Detection>) -> &Self {
        self.state.lock().replies.push_back(Reply::Detections(detections));
        self
    }

    /// 追加一次原始 JSON 响应（走正式的解析路径）
    pub fn push_response(&self, body: impl Into<String>) -> &Self {
        self.state.lock().replies.push_back(Reply::Body(body.into()));
        self
    }

    /// 追加一次传输错误
    pub fn push_error(&self, message: impl Into<String>) -> &Self {
        self.state.lock().replies.push_back(Reply::Error(message.into()));
        self
    }

    /// 已被调用的次数
    pub fn calls(&self) -> usize {
        self.state.lock().calls
    }

    /// 剩余脚本条数
    pub fn remaining(&self) -> usize {
        self.state.lock().replies.len()
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&mut self, _frame: &Frame) -> Result<Vec<Detection>, ClassifierError> {
        let mut state = self.state.lock();
        state.calls += 1;
        match state.replies.pop_front() {
            Some(Reply::Detections(detections)) => Ok(detections),
            Some(Reply::Body(body)) => Ok(decode_response(&body)?),
            Some(Reply::Error(message)) => Err(ClassifierError::Transport(message)),
            None => Ok(Vec::new()),
        }
    }
}
