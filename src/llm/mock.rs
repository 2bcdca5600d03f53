//! Mock 生成器（用于测试，无需服务）
//!
//! 按顺序返回预置回复，用完后重复最后一条；记录调用次数与收到的提示词。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{AnswerGenerator, LlmError};

/// 预置的单次结果：成功文本或模拟超时
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Timeout,
}

#[derive(Debug, Default)]
pub struct MockGenerator {
    replies: Mutex<VecDeque<MockReply>>,
    last: Mutex<Option<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockGenerator {
    /// 每次都返回同一段文本
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::scripted(vec![MockReply::Text(text.into())])
    }

    pub fn scripted(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> MockReply {
        let popped = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(reply) = popped {
            *last = Some(reply);
        }
        (*last)
            .clone()
            .unwrap_or_else(|| MockReply::Text("(mock answer)".to_string()))
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut p) = self.prompts.lock() {
            p.push(prompt.to_string());
        }
        match self.next_reply() {
            MockReply::Text(t) => Ok(t.trim().to_string()),
            MockReply::Timeout => Err(LlmError::Timeout(120)),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
