//! Chatbot 构建器：统一的初始化逻辑
//!
//! 从 AppConfig 组装注册表、知识索引、生成服务与表单存储；各组件都可用 with_* 替换（测试时注入 Mock）。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::BotError;
use crate::dialogue::DialogueEngine;
use crate::knowledge::{ensure_seeded, load_faq_entries, FaqEntry, KnowledgeIndex, VectorIndex};
use crate::llm::{create_embedder_from_config, AnswerGenerator, OllamaGenerator};
use crate::session::{MemorySessionRegistry, SessionRegistry};
use crate::store::{RecordStore, SqliteRecordStore};

pub struct ChatbotBuilder {
    config: AppConfig,
    faqs: Option<Vec<FaqEntry>>,
    registry: Option<Arc<dyn SessionRegistry>>,
    index: Option<Arc<dyn KnowledgeIndex>>,
    generator: Option<Arc<dyn AnswerGenerator>>,
    store: Option<Arc<dyn RecordStore>>,
}

impl ChatbotBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            faqs: None,
            registry: None,
            index: None,
            generator: None,
            store: None,
        }
    }

    /// 直接给定 FAQ 数据，不读 faq_path
    pub fn with_faqs(mut self, faqs: Vec<FaqEntry>) -> Self {
        self.faqs = Some(faqs);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn SessionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_index(mut self, index: Arc<dyn KnowledgeIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_generator(mut self, generator: Arc<dyn AnswerGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// FAQ 文件缺失时只告警：索引保持为空，所有问题都会得到领域外回复
    fn load_faqs(&self) -> Result<Vec<FaqEntry>, BotError> {
        let path = &self.config.app.faq_path;
        if !path.exists() {
            tracing::warn!("FAQ file {} not found, knowledge base is empty", path.display());
            return Ok(Vec::new());
        }
        let faqs = load_faq_entries(path)?;
        tracing::info!("Loaded {} FAQs from {}", faqs.len(), path.display());
        Ok(faqs)
    }

    fn build_index(&self) -> Result<Arc<dyn KnowledgeIndex>, BotError> {
        let embedder = create_embedder_from_config(&self.config.embedding);
        let index: Arc<dyn KnowledgeIndex> = match &self.config.knowledge.index_path {
            Some(path) => Arc::new(VectorIndex::open(embedder, path)?),
            None => Arc::new(VectorIndex::new(embedder)),
        };
        Ok(index)
    }

    /// 组装对话引擎；返回前完成知识库灌库
    pub async fn build(mut self) -> Result<DialogueEngine, BotError> {
        let faqs = match self.faqs.take() {
            Some(faqs) => faqs,
            None => self.load_faqs()?,
        };

        let index = match self.index.take() {
            Some(index) => index,
            None => self.build_index()?,
        };
        let added = ensure_seeded(index.as_ref(), &faqs).await?;
        if added > 0 {
            tracing::info!("Indexed {} FAQs", added);
        }

        let generator: Arc<dyn AnswerGenerator> = match self.generator.take() {
            Some(g) => g,
            None => {
                let g = OllamaGenerator::from_config(&self.config.llm)?;
                tracing::info!("Using Ollama generator ({} at {})", self.config.llm.model, self.config.llm.base_url);
                Arc::new(g)
            }
        };

        let store: Arc<dyn RecordStore> = match self.store.take() {
            Some(s) => s,
            None => Arc::new(SqliteRecordStore::open(&self.config.store.db_path)?),
        };

        let registry: Arc<dyn SessionRegistry> = match self.registry.take() {
            Some(r) => r,
            None => Arc::new(MemorySessionRegistry::new()),
        };

        Ok(DialogueEngine::new(registry, index, generator, store)
            .with_company(self.config.company.clone())
            .with_top_n(self.config.retrieval.top_n)
            .with_nudge_threshold(self.config.dialogue.nudge_threshold))
    }
}
