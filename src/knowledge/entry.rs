//! FAQ 条目与数据文件加载

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::KnowledgeError;

/// 一条 FAQ：问题（用于嵌入检索）+ 答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub label: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(label: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            answer: answer.into(),
        }
    }

    /// 提示词上下文中的格式
    pub fn as_context(&self) -> String {
        format!("Q: {}\nA: {}", self.label, self.answer)
    }
}

/// 读取 `[{"label": ..., "answer": ...}, ...]` 形式的 JSON 文件
pub fn load_faq_entries(path: impl AsRef<Path>) -> Result<Vec<FaqEntry>, KnowledgeError> {
    let data = std::fs::read_to_string(path.as_ref())?;
    let entries: Vec<FaqEntry> = serde_json::from_str(&data)?;
    Ok(entries)
}
