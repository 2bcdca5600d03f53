//! 对话层：表单文案、提示词拼装、对话状态机

pub mod engine;
pub mod forms;
pub mod prompt;

pub use engine::DialogueEngine;
