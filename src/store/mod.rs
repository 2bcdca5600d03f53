//! 表单持久化：提交记录、存储接口与实现（SQLite / 内存）
//!
//! 存储自己吞掉失败：submit 永远返回一行给用户看的状态文本，不向对话引擎抛错。

pub mod memory;
pub mod sqlite;
pub mod submission;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use submission::FormSubmission;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection lock poisoned")]
    Poisoned,

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// 一次提交的结果：状态文本 + 成功时的记录 ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub message: String,
    pub id: Option<i64>,
}

impl SubmitReceipt {
    pub fn saved(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

/// 追加记录、返回 ID 的存储服务
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn submit(&self, submission: &FormSubmission) -> SubmitReceipt;
}
