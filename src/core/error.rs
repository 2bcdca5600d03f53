//! 启动阶段的错误类型
//!
//! 运行期的失败（生成超时、存储失败、坏片段）都在调用点就地处理成回复文本，不会走到这里。

use thiserror::Error;

use crate::knowledge::KnowledgeError;
use crate::llm::LlmError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}
