//! 启动时灌库：索引为空才嵌入并写入，数组下标作为条目 ID

use super::{FaqEntry, KnowledgeError, KnowledgeIndex};

/// 返回本次新写入的条目数（索引非空时为 0）
pub async fn ensure_seeded(
    index: &dyn KnowledgeIndex,
    entries: &[FaqEntry],
) -> Result<usize, KnowledgeError> {
    if index.count().await > 0 {
        tracing::debug!("FAQ index already populated, skip seeding");
        return Ok(0);
    }

    tracing::info!("Indexing {} FAQs...", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        index.add(&i.to_string(), entry.clone()).await?;
    }
    index.flush().await?;
    Ok(entries.len())
}
