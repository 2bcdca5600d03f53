//! 对话引擎：每次调用处理一句用户输入，恰好返回一条回复
//!
//! 优先级：刚结束的会话先复位 → 进行中的表单 → 表单触发词 → FAQ 检索与生成。
//! 引擎本身不跨调用保存状态，开头从注册表取出 SessionState，返回前写回。

use std::sync::Arc;

use crate::config::CompanySection;
use crate::dialogue::{forms, prompt};
use crate::knowledge::KnowledgeIndex;
use crate::llm::AnswerGenerator;
use crate::session::{FormField, FormKind, FormProgress, Phase, SessionRegistry, SessionState};
use crate::store::{FormSubmission, RecordStore};

pub struct DialogueEngine {
    registry: Arc<dyn SessionRegistry>,
    index: Arc<dyn KnowledgeIndex>,
    generator: Arc<dyn AnswerGenerator>,
    store: Arc<dyn RecordStore>,
    company: CompanySection,
    top_n: usize,
    nudge_threshold: u32,
}

impl DialogueEngine {
    pub fn new(
        registry: Arc<dyn SessionRegistry>,
        index: Arc<dyn KnowledgeIndex>,
        generator: Arc<dyn AnswerGenerator>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        Self {
            registry,
            index,
            generator,
            store,
            company: CompanySection::default(),
            top_n: 3,
            nudge_threshold: 3,
        }
    }

    pub fn with_company(mut self, company: CompanySection) -> Self {
        self.company = company;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// 阈值至少为 1
    pub fn with_nudge_threshold(mut self, threshold: u32) -> Self {
        self.nudge_threshold = threshold.max(1);
        self
    }

    /// 处理一句用户输入
    pub async fn respond(&self, user_id: &str, utterance: &str) -> String {
        let mut state = self.registry.get(user_id).await;
        let normalized = utterance.trim().to_lowercase();

        if state.phase() == Phase::JustEnded {
            tracing::debug!(user_id, "resetting ended session");
            state.reset_session();
        }

        if let Some(progress) = state.form.take() {
            if normalized == forms::QUIT_KEYWORD {
                self.registry.put(user_id, state).await;
                return forms::cancelled().to_string();
            }
            return self.advance_form(user_id, state, progress, utterance).await;
        }

        if let Some(kind) = forms::trigger_for(&normalized) {
            return self.start_form(user_id, state, kind).await;
        }

        self.answer_faq(user_id, state, utterance).await
    }

    /// 全局结束对话：置结束标记并丢弃进行中的表单，下一句输入时复位
    pub async fn end_chat(&self, user_id: &str) -> String {
        let mut state = self.registry.get(user_id).await;
        state.end();
        self.registry.put(user_id, state).await;
        tracing::info!(user_id, "chat ended");
        forms::farewell().to_string()
    }

    async fn start_form(&self, user_id: &str, mut state: SessionState, kind: FormKind) -> String {
        if state.is_completed(kind) {
            self.registry.put(user_id, state).await;
            return forms::already_submitted(kind).to_string();
        }
        tracing::debug!(user_id, form = kind.as_str(), "form started");
        state.form = Some(FormProgress::new(kind));
        self.registry.put(user_id, state).await;
        forms::field_prompt(kind, FormField::Name)
    }

    /// 原样记录输入（不 trim、不校验）到下一个缺失字段；收齐则提交
    async fn advance_form(
        &self,
        user_id: &str,
        mut state: SessionState,
        mut progress: FormProgress,
        value: &str,
    ) -> String {
        let kind = progress.kind();
        progress.record(value);

        let submission = match FormSubmission::from_progress(&progress) {
            Ok(submission) => submission,
            Err(next) => {
                state.form = Some(progress);
                self.registry.put(user_id, state).await;
                return forms::field_prompt(kind, next);
            }
        };

        tracing::info!(user_id, form = kind.as_str(), "form complete, submitting");
        let receipt = self.store.submit(&submission).await;
        if !receipt.is_saved() {
            tracing::warn!(user_id, form = kind.as_str(), "submission not persisted: {}", receipt.message);
        }
        state.mark_submitted();
        self.registry.put(user_id, state).await;
        forms::confirmation(kind, &receipt.message, &self.company)
    }

    async fn answer_faq(&self, user_id: &str, mut state: SessionState, utterance: &str) -> String {
        let hits = match self.index.query(utterance, self.top_n).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("knowledge index query failed: {}", e);
                Vec::new()
            }
        };
        // 先提交本轮之前的改动（如结束复位），生成失败也不会丢
        self.registry.put(user_id, state.clone()).await;

        if hits.is_empty() {
            return forms::deflection(&self.company);
        }

        let context = prompt::build_context(&hits);
        let prompt = prompt::build_prompt(&self.company, &context, utterance);
        let mut answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(model = self.generator.model(), "generation failed: {}", e);
                return format!("⚠️ AI error: {}", e);
            }
        };

        state.faq_turns += 1;
        if state.faq_turns >= self.nudge_threshold {
            state.faq_turns = 0;
            if let Some(nudge) = prompt::upsell(&state.pending_forms()) {
                answer.push_str(&nudge);
            }
        }
        self.registry.put(user_id, state).await;
        answer
    }
}
