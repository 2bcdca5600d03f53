//! faqbot - 企业客服机器人
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、Chatbot 构建器
//! - **dialogue**: 对话状态机（表单流程 / 触发词 / FAQ 回答与推荐）
//! - **knowledge**: FAQ 数据、向量索引与启动灌库
//! - **llm**: 生成服务（Ollama / Mock）与嵌入提供方
//! - **observability**: 日志初始化
//! - **session**: 每用户会话状态与注册表
//! - **store**: 表单提交持久化（SQLite / 内存）

pub mod config;
pub mod core;
pub mod dialogue;
pub mod knowledge;
pub mod llm;
pub mod observability;
pub mod session;
pub mod store;

pub use crate::core::{BotError, ChatbotBuilder};
pub use dialogue::DialogueEngine;
