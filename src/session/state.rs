//! 会话状态：表单进度、FAQ 轮数、已提交表单、结束标记
//!
//! 对话阶段（Idle / FormActive / JustEnded）不单独存储，每次从 SessionState 推导。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// 表单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    /// 项目咨询
    Client,
    /// 求职申请
    Jobseeker,
}

impl FormKind {
    pub const ALL: [FormKind; 2] = [FormKind::Client, FormKind::Jobseeker];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Client => "client",
            FormKind::Jobseeker => "jobseeker",
        }
    }

    /// 固定字段顺序
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            FormKind::Client => &[
                FormField::Name,
                FormField::Email,
                FormField::Phone,
                FormField::TechStack,
                FormField::ProjectDescription,
            ],
            FormKind::Jobseeker => &[
                FormField::Name,
                FormField::Email,
                FormField::ResumeLink,
                FormField::Skills,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    TechStack,
    ProjectDescription,
    ResumeLink,
    Skills,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::TechStack => "tech_stack",
            FormField::ProjectDescription => "project_description",
            FormField::ResumeLink => "resume_link",
            FormField::Skills => "skills",
        }
    }
}

/// 进行中的表单：只能按 schema 顺序追加下一个缺失字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProgress {
    kind: FormKind,
    fields: Vec<(FormField, String)>,
}

impl FormProgress {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: Vec::new(),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[(FormField, String)] {
        &self.fields
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    /// 下一个待收集字段；全部收齐时为 None
    pub fn next_field(&self) -> Option<FormField> {
        self.kind.fields().get(self.fields.len()).copied()
    }

    /// 把 value 记到下一个缺失字段上，返回该字段；已收齐时不做任何事
    pub fn record(&mut self, value: impl Into<String>) -> Option<FormField> {
        let field = self.next_field()?;
        self.fields.push((field, value.into()));
        Some(field)
    }
}

/// 由 SessionState 推导出的对话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    FormActive { kind: FormKind, next: FormField },
    JustEnded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub form: Option<FormProgress>,
    /// 距上次推荐表单以来的 FAQ 回答数
    pub faq_turns: u32,
    pub completed: BTreeSet<FormKind>,
    pub ended: bool,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.ended {
            return Phase::JustEnded;
        }
        match &self.form {
            Some(form) => match form.next_field() {
                Some(next) => Phase::FormActive {
                    kind: form.kind(),
                    next,
                },
                None => Phase::Idle,
            },
            None => Phase::Idle,
        }
    }

    pub fn is_completed(&self, kind: FormKind) -> bool {
        self.completed.contains(&kind)
    }

    /// 任一表单提交后两种表单都视为已完成
    pub fn mark_submitted(&mut self) {
        self.completed.extend(FormKind::ALL);
    }

    /// 尚未完成的表单，按固定顺序
    pub fn pending_forms(&self) -> Vec<FormKind> {
        FormKind::ALL
            .into_iter()
            .filter(|k| !self.completed.contains(k))
            .collect()
    }

    /// 全局结束对话；结束同时丢弃进行中的表单
    pub fn end(&mut self) {
        self.ended = true;
        self.form = None;
    }

    /// 清掉表单、FAQ 计数与结束标记，保留已完成表单
    pub fn reset_session(&mut self) {
        self.form = None;
        self.faq_turns = 0;
        self.ended = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_records_in_schema_order() {
        let mut form = FormProgress::new(FormKind::Jobseeker);
        assert_eq!(form.next_field(), Some(FormField::Name));
        assert_eq!(form.record("Ann"), Some(FormField::Name));
        assert_eq!(form.record("ann@x.com"), Some(FormField::Email));
        assert_eq!(form.record("http://cv"), Some(FormField::ResumeLink));
        assert!(form.next_field().is_some());
        assert_eq!(form.record("rust, sql"), Some(FormField::Skills));
        assert!(form.next_field().is_none());
        assert_eq!(form.record("extra"), None);
        assert_eq!(form.fields().len(), 4);
        assert_eq!(form.get(FormField::ResumeLink), Some("http://cv"));
        assert_eq!(form.get(FormField::Phone), None);
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), Phase::Idle);

        state.form = Some(FormProgress::new(FormKind::Client));
        assert_eq!(
            state.phase(),
            Phase::FormActive {
                kind: FormKind::Client,
                next: FormField::Name
            }
        );

        state.end();
        assert_eq!(state.phase(), Phase::JustEnded);
        assert!(state.form.is_none());
    }

    #[test]
    fn test_mark_submitted_locks_both_forms() {
        let mut state = SessionState::default();
        assert_eq!(state.pending_forms(), vec![FormKind::Client, FormKind::Jobseeker]);
        state.mark_submitted();
        assert!(state.is_completed(FormKind::Client));
        assert!(state.is_completed(FormKind::Jobseeker));
        assert!(state.pending_forms().is_empty());
    }

    #[test]
    fn test_reset_session_keeps_completed() {
        let mut state = SessionState {
            form: Some(FormProgress::new(FormKind::Client)),
            faq_turns: 2,
            completed: [FormKind::Client, FormKind::Jobseeker].into_iter().collect(),
            ended: true,
        };
        state.reset_session();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.faq_turns, 0);
        assert_eq!(state.completed.len(), 2);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&FormKind::Jobseeker).unwrap();
        assert_eq!(json, "\"jobseeker\"");
        let json = serde_json::to_string(&FormField::TechStack).unwrap();
        assert_eq!(json, "\"tech_stack\"");
    }
}
