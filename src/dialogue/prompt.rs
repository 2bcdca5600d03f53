//! 检索结果拼装为生成提示词；FAQ 轮数到阈值时的表单推荐语

use crate::config::CompanySection;
use crate::dialogue::forms;
use crate::knowledge::FaqEntry;
use crate::session::FormKind;

/// 每条命中格式化为 `Q: ..\nA: ..`，换行连接
pub fn build_context(hits: &[FaqEntry]) -> String {
    hits.iter()
        .map(FaqEntry::as_context)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(company: &CompanySection, context: &str, question: &str) -> String {
    format!(
        r#"You are the official chatbot of {name}.
Answer the user's question clearly, naturally, and professionally.

Use only the information provided below to answer.
If the answer is not available in the information, do NOT assume, guess, or make up any details.
Instead, politely guide the user to contact our team by saying:
"You can reach us directly by phone at {phone} or email us at {email}."

Never say phrases like "I couldn't find that," "the context doesn't mention," or "according to the information."
Speak confidently as a company representative who has this knowledge.

Information:
{context}

User Question:
{question}

Provide a direct, confident answer in 2-4 lines as if you are the company's assistant."#,
        name = company.name,
        phone = company.phone,
        email = company.email,
        context = context,
        question = question,
    )
}

/// 只列出尚未完成的表单；全部完成时为 None
pub fn upsell(pending: &[FormKind]) -> Option<String> {
    let suggestions: Vec<String> = pending
        .iter()
        .map(|kind| {
            let action = match kind {
                FormKind::Client => "discuss a project",
                FormKind::Jobseeker => "apply for a job",
            };
            format!("{} - type: \"{}\"", action, forms::shortcut(*kind))
        })
        .collect();
    if suggestions.is_empty() {
        return None;
    }
    Some(format!(
        "\n\n💡 By the way, to {}, or you can continue asking questions!",
        suggestions.join(" or ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_context() {
        let hits = vec![
            FaqEntry::new("Q1?", "A1."),
            FaqEntry::new("Q2?", "A2."),
        ];
        assert_eq!(build_context(&hits), "Q: Q1?\nA: A1.\nQ: Q2?\nA: A2.");
    }

    #[test]
    fn test_prompt_carries_context_question_and_contacts() {
        let company = CompanySection::default();
        let prompt = build_prompt(&company, "Q: Hours?\nA: 9-6", "when are you open");
        assert!(prompt.contains("Q: Hours?\nA: 9-6"));
        assert!(prompt.contains("User Question:\nwhen are you open"));
        assert!(prompt.contains("+91 947 456 2952"));
        assert!(prompt.contains("info@codextechnolife.com"));
        assert!(prompt.contains("2-4 lines"));
    }

    #[test]
    fn test_upsell_variants() {
        let both = upsell(&[FormKind::Client, FormKind::Jobseeker]).unwrap();
        assert_eq!(
            both,
            "\n\n💡 By the way, to discuss a project - type: \"A\" or apply for a job - type: \"B\", or you can continue asking questions!"
        );
        let job_only = upsell(&[FormKind::Jobseeker]).unwrap();
        assert!(job_only.contains("apply for a job"));
        assert!(!job_only.contains("discuss a project"));
        assert!(upsell(&[]).is_none());
    }
}
