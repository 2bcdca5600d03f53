//! 内存表单存储：记录每次提交，可模拟写入失败（测试与无数据库运行）

use std::sync::Mutex;

use async_trait::async_trait;

use super::{FormSubmission, RecordStore, SubmitReceipt};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<FormSubmission>>,
    fail_with: Option<String>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次提交都失败并返回给定原因
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_with: Some(reason.into()),
        }
    }

    /// 收到的全部提交（含失败的）
    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn submit(&self, submission: &FormSubmission) -> SubmitReceipt {
        let id = match self.records.lock() {
            Ok(mut records) => {
                records.push(submission.clone());
                records.len() as i64
            }
            Err(_) => return SubmitReceipt::failed("❌ Error saving info: store poisoned"),
        };
        match &self.fail_with {
            Some(reason) => {
                tracing::error!("Error saving {} info: {}", submission.kind.as_str(), reason);
                SubmitReceipt::failed(format!("❌ Error saving {} info: {}", submission.kind.as_str(), reason))
            }
            None => SubmitReceipt::saved(format!("✅ {} info saved (ID: {})", submission.kind.as_str(), id), id),
        }
    }
}
