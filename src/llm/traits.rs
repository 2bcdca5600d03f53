//! 生成服务抽象
//!
//! 所有后端（Ollama / Mock）实现 AnswerGenerator：输入提示词，返回拼接并修剪后的完整回答。

use async_trait::async_trait;
use thiserror::Error;

/// 生成与嵌入调用的错误（超时、传输、非 2xx、嵌入失败）
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("embedding error: {0}")]
    Embedding(String),
}

/// 生成服务 trait：给定提示词返回回答文本
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// 模型标识，仅用于日志
    fn model(&self) -> &str {
        "unknown"
    }
}
