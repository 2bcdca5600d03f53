//! 知识库：FAQ 条目、向量索引（最近邻检索）、启动灌库

pub mod entry;
pub mod index;
pub mod seed;

use thiserror::Error;

use crate::llm::LlmError;

pub use entry::{load_faq_entries, FaqEntry};
pub use index::{KnowledgeIndex, VectorIndex};
pub use seed::ensure_seeded;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Embedding(#[from] LlmError),

    #[error("embedding service returned an empty vector for '{0}'")]
    EmptyEmbedding(String),
}
