//! 核心装配层：错误类型与进程级 Chatbot 构建

pub mod builder;
pub mod error;

pub use builder::ChatbotBuilder;
pub use error::BotError;
