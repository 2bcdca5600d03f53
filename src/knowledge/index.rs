//! FAQ 向量索引
//!
//! 嵌入 label 文本，按余弦相似度返回最近的 top-N 条。不设相似度阈值：索引非空就总有结果。
//! 可选 JSON 快照，重启后免去重新嵌入。快照记录生成向量的嵌入指纹，指纹不符时丢弃，由灌库重建。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::{FaqEntry, KnowledgeError};
use crate::llm::EmbeddingProvider;

/// 最近邻文本检索服务
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    /// 已索引的条目数
    async fn count(&self) -> usize;

    async fn add(&self, id: &str, entry: FaqEntry) -> Result<(), KnowledgeError>;

    /// 按相似度降序返回至多 top_n 条
    async fn query(&self, text: &str, top_n: usize) -> Result<Vec<FaqEntry>, KnowledgeError>;

    /// 把当前内容落盘（无持久化的实现什么也不做）
    async fn flush(&self) -> Result<(), KnowledgeError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedEntry {
    id: String,
    entry: FaqEntry,
    embedding: Vec<f32>,
}

/// 磁盘快照：向量只在同一指纹下有意义
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    embedder: String,
    entries: Vec<IndexedEntry>,
}

/// 不带指纹的旧格式（纯数组）也能读入，但一律视为过期
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Current(Snapshot),
    Legacy(Vec<IndexedEntry>),
}

pub struct VectorIndex {
    entries: RwLock<Vec<IndexedEntry>>,
    embedder: Arc<dyn EmbeddingProvider>,
    snapshot_path: Option<PathBuf>,
}

impl VectorIndex {
    /// 纯内存索引
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            embedder,
            snapshot_path: None,
        }
    }

    /// 带快照的索引：文件存在且嵌入指纹一致则载入，否则从空索引开始；flush 时写回
    pub fn open(
        embedder: Arc<dyn EmbeddingProvider>,
        path: impl AsRef<Path>,
    ) -> Result<Self, KnowledgeError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let stored: StoredSnapshot = serde_json::from_str(&data)?;
            Self::usable_entries(stored, &embedder.fingerprint(), &path)
        } else {
            Vec::new()
        };
        Ok(Self {
            entries: RwLock::new(entries),
            embedder,
            snapshot_path: Some(path),
        })
    }

    fn usable_entries(stored: StoredSnapshot, fingerprint: &str, path: &Path) -> Vec<IndexedEntry> {
        match stored {
            StoredSnapshot::Current(snapshot) if snapshot.embedder == fingerprint => {
                tracing::info!(
                    "Loaded {} indexed FAQs from {}",
                    snapshot.entries.len(),
                    path.display()
                );
                snapshot.entries
            }
            StoredSnapshot::Current(snapshot) => {
                tracing::warn!(
                    "FAQ index {} was built with embedder '{}', current is '{}'; discarding it",
                    path.display(),
                    snapshot.embedder,
                    fingerprint
                );
                Vec::new()
            }
            StoredSnapshot::Legacy(_) => {
                tracing::warn!(
                    "FAQ index {} has no embedder fingerprint; discarding it",
                    path.display()
                );
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl KnowledgeIndex for VectorIndex {
    async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn add(&self, id: &str, entry: FaqEntry) -> Result<(), KnowledgeError> {
        let embedding = self.embedder.embed(&entry.label).await?;
        if embedding.is_empty() {
            return Err(KnowledgeError::EmptyEmbedding(entry.label));
        }
        let mut entries = self.entries.write().await;
        entries.retain(|e| e.id != id);
        entries.push(IndexedEntry {
            id: id.to_string(),
            entry,
            embedding,
        });
        Ok(())
    }

    async fn query(&self, text: &str, top_n: usize) -> Result<Vec<FaqEntry>, KnowledgeError> {
        if top_n == 0 || self.count().await == 0 {
            return Ok(Vec::new());
        }
        // 读锁不跨越嵌入调用
        let query_embedding = self.embedder.embed(text).await?;
        let entries = self.entries.read().await;

        let mut scored: Vec<(f32, &FaqEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(&query_embedding, &e.embedding), &e.entry))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn flush(&self) -> Result<(), KnowledgeError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            embedder: self.embedder.fingerprint(),
            entries: self.entries.read().await.clone(),
        };
        std::fs::write(path, serde_json::to_string(&snapshot)?)?;
        tracing::debug!("FAQ index snapshot written to {}", path.display());
        Ok(())
    }
}

/// 余弦相似度；维度不一致或零向量时为 0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::HashingEmbedder;

    fn index() -> VectorIndex {
        VectorIndex::new(Arc::new(HashingEmbedder::default()))
    }

    async fn seeded() -> VectorIndex {
        let idx = index();
        idx.add("0", FaqEntry::new("What services do you offer", "Web and mobile apps."))
            .await
            .unwrap();
        idx.add("1", FaqEntry::new("Where is your office located", "Pune."))
            .await
            .unwrap();
        idx.add("2", FaqEntry::new("Are you hiring interns", "Yes, twice a year."))
            .await
            .unwrap();
        idx.add("3", FaqEntry::new("What are your working hours", "9 to 6."))
            .await
            .unwrap();
        idx
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 0.001);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_index_returns_nothing() {
        assert!(index().query("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_ranks_closest_label_first() {
        let idx = seeded().await;
        let hits = idx.query("where is the office", 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].answer, "Pune.");
    }

    #[tokio::test]
    async fn test_unrelated_query_still_returns_top_n() {
        let idx = seeded().await;
        let hits = idx.query("zzz qqq", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_add_same_id_replaces() {
        let idx = index();
        idx.add("0", FaqEntry::new("a question", "old")).await.unwrap();
        idx.add("0", FaqEntry::new("a question", "new")).await.unwrap();
        assert_eq!(idx.count().await, 1);
        assert_eq!(idx.query("a question", 3).await.unwrap()[0].answer, "new");
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("index.json");
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::default());

        let idx = VectorIndex::open(embedder.clone(), &path).unwrap();
        assert_eq!(idx.count().await, 0);
        idx.add("0", FaqEntry::new("What services do you offer", "Apps."))
            .await
            .unwrap();
        idx.flush().await.unwrap();

        let reopened = VectorIndex::open(embedder, &path).unwrap();
        assert_eq!(reopened.count().await, 1);
        assert_eq!(reopened.query("services", 1).await.unwrap()[0].answer, "Apps.");
    }

    #[tokio::test]
    async fn test_snapshot_from_other_embedder_is_discarded_and_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let faqs = vec![
            FaqEntry::new("What services do you offer", "Apps."),
            FaqEntry::new("Where is your office located", "Pune."),
        ];

        let first = VectorIndex::open(Arc::new(HashingEmbedder::new(256)), &path).unwrap();
        assert_eq!(crate::knowledge::ensure_seeded(&first, &faqs).await.unwrap(), 2);

        let reopened = VectorIndex::open(Arc::new(HashingEmbedder::new(64)), &path).unwrap();
        assert_eq!(reopened.count().await, 0);
        assert_eq!(crate::knowledge::ensure_seeded(&reopened, &faqs).await.unwrap(), 2);
        let hits = reopened.query("where is your office located", 1).await.unwrap();
        assert_eq!(hits[0].answer, "Pune.");

        // 重建后的快照带新指纹，同一嵌入再次打开可直接使用
        let again = VectorIndex::open(Arc::new(HashingEmbedder::new(64)), &path).unwrap();
        assert_eq!(again.count().await, 2);
    }

    #[tokio::test]
    async fn test_legacy_snapshot_without_fingerprint_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(
            &path,
            r#"[{"id": "0", "entry": {"label": "q", "answer": "a"}, "embedding": [1.0, 0.0]}]"#,
        )
        .unwrap();
        let idx = VectorIndex::open(Arc::new(HashingEmbedder::default()), &path).unwrap();
        assert_eq!(idx.count().await, 0);
    }
}
