//! 表单流程的固定文案：触发词、逐字段提示、取消/已提交/确认回复

use crate::config::CompanySection;
use crate::session::{FormField, FormKind};

pub const QUIT_KEYWORD: &str = "/quit";

pub const QUIT_HINT: &str = "💡 (If you wish to quit anytime, type /quit)";

const CLIENT_TRIGGERS: &[&str] = &["start project", "project form", "client form", "a"];
const JOB_TRIGGERS: &[&str] = &["start job", "apply job", "job form", "b"];

/// 输入需已 trim + 小写
pub fn trigger_for(normalized: &str) -> Option<FormKind> {
    if CLIENT_TRIGGERS.contains(&normalized) {
        Some(FormKind::Client)
    } else if JOB_TRIGGERS.contains(&normalized) {
        Some(FormKind::Jobseeker)
    } else {
        None
    }
}

/// 推荐语里使用的快捷触发词
pub fn shortcut(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Client => "A",
        FormKind::Jobseeker => "B",
    }
}

/// 询问 `next` 字段的提示；Name 即表单开场白
pub fn field_prompt(kind: FormKind, next: FormField) -> String {
    let ask = match next {
        FormField::Name => match kind {
            FormKind::Client => {
                "💼 Great! Let's start your project inquiry. Please tell me your full name."
            }
            FormKind::Jobseeker => "👩‍💻 Awesome! Let's start your application. What's your full name?",
        },
        FormField::Email => match kind {
            FormKind::Client => "Got it 👍 Please share your email address:",
            FormKind::Jobseeker => "Thanks! Please share your email address:",
        },
        FormField::Phone => "Got it 👍 Please share your contact number:",
        FormField::TechStack => "Thanks! What tech stack are you interested in for your project?",
        FormField::ProjectDescription => "Nice choice! Could you describe your project idea briefly?",
        FormField::ResumeLink => {
            "Got it. Could you share your resume link (Google Drive or any public URL)?"
        }
        FormField::Skills => "Perfect! Lastly, list your top skills (comma-separated):",
    };
    format!("{}\n{}", ask, QUIT_HINT)
}

pub fn cancelled() -> &'static str {
    "👌 No problem! I've canceled the form. You can still ask FAQs or start again anytime."
}

pub fn already_submitted(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Client => {
            "✅ You've already submitted a project inquiry in this session.\n💡 If you need to make changes, please contact our team directly or restart the chat."
        }
        FormKind::Jobseeker => {
            "✅ You've already submitted a job application in this session.\n💡 If you need to make changes, please contact our HR team directly or restart the chat."
        }
    }
}

/// 提交确认：存储返回的状态行 + 致谢 + 继续聊天的邀请
pub fn confirmation(kind: FormKind, status: &str, company: &CompanySection) -> String {
    let (follow_up, thanks) = match kind {
        FormKind::Client => ("💼 Our team will contact you soon.", "choosing"),
        FormKind::Jobseeker => (
            "😊 Our HR team will review your application and reach out soon!",
            "connecting with",
        ),
    };
    format!(
        "{}\n{}\n🤖 Thank you for {} {}!\n\n✨ Feel free to ask more questions or type 'exit' to end the chat.",
        status, follow_up, thanks, company.short_name
    )
}

/// 检索无结果时的领域外回复
pub fn deflection(company: &CompanySection) -> String {
    format!(
        "⚠️ I can only answer questions related to {}. Please ask something about our company or services.",
        company.name
    )
}

pub fn farewell() -> &'static str {
    "🤖 It was great chatting with you! 😊\n💡 Have a wonderful day ahead, and don't hesitate to return if you need help again. 👋"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_phrases() {
        assert_eq!(trigger_for("start project"), Some(FormKind::Client));
        assert_eq!(trigger_for("a"), Some(FormKind::Client));
        assert_eq!(trigger_for("apply job"), Some(FormKind::Jobseeker));
        assert_eq!(trigger_for("b"), Some(FormKind::Jobseeker));
        assert_eq!(trigger_for("start a project please"), None);
        assert_eq!(trigger_for("Start Project"), None);
    }

    #[test]
    fn test_every_schema_field_has_prompt_with_hint() {
        for kind in FormKind::ALL {
            for field in kind.fields() {
                assert!(field_prompt(kind, *field).ends_with(QUIT_HINT));
            }
        }
        assert_ne!(
            field_prompt(FormKind::Client, FormField::Name),
            field_prompt(FormKind::Jobseeker, FormField::Name)
        );
        assert!(field_prompt(FormKind::Jobseeker, FormField::Email).starts_with("Thanks!"));
    }

    #[test]
    fn test_confirmation_embeds_status() {
        let company = CompanySection::default();
        let msg = confirmation(FormKind::Client, "✅ Client info saved (ID: 7)", &company);
        assert!(msg.starts_with("✅ Client info saved (ID: 7)\n"));
        assert!(msg.contains("Thank you for choosing CodeX Technolife!"));
        assert!(msg.ends_with("type 'exit' to end the chat."));
    }
}
