//! 表单提交记录：字段收齐时构造，交给 RecordStore 一次后丢弃

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{FormField, FormKind, FormProgress};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub kind: FormKind,
    pub fields: Vec<(FormField, String)>,
    pub submitted_at: DateTime<Utc>,
}

impl FormSubmission {
    /// 字段收齐时构造提交；否则返回下一个待收集的字段
    pub fn from_progress(progress: &FormProgress) -> Result<Self, FormField> {
        if let Some(next) = progress.next_field() {
            return Err(next);
        }
        Ok(Self {
            kind: progress.kind(),
            fields: progress.fields().to_vec(),
            submitted_at: Utc::now(),
        })
    }

    pub fn get(&self, field: FormField) -> &str {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// 写入 user_id 列的来源标记
    pub fn source_tag(&self) -> &'static str {
        match self.kind {
            FormKind::Client => "client",
            FormKind::Jobseeker => "JobSeeker",
        }
    }
}
