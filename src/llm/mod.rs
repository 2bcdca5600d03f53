//! LLM 层：生成服务抽象与实现（Ollama / Mock）、嵌入提供方

pub mod embedding;
pub mod mock;
pub mod ollama;
pub mod traits;

pub use embedding::{create_embedder_from_config, EmbeddingProvider, HashingEmbedder, OpenAiEmbedder};
pub use mock::{MockGenerator, MockReply};
pub use ollama::{collect_response_text, OllamaGenerator};
pub use traits::{AnswerGenerator, LlmError};
