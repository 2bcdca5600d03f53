//! Ollama `/api/generate` 客户端
//!
//! 响应体是逐行的 JSON 片段 `{"response": "..."}`；逐行独立解析，解析失败的行直接跳过。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::LlmSection;
use crate::llm::{AnswerGenerator, LlmError};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

/// 单个流式片段；缺少 response 字段的片段（如最后的 done 行）贡献空串
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: String,
}

/// 把换行分隔的片段拼成最终回答：逐行解析，跳过坏行，最后 trim
pub fn collect_response_text(raw: &str) -> String {
    let mut answer = String::new();
    for line in raw.trim().lines() {
        match serde_json::from_str::<GenerateChunk>(line) {
            Ok(chunk) => answer.push_str(&chunk.response),
            Err(e) => tracing::trace!("skip malformed fragment: {}", e),
        }
    }
    answer.trim().to_string()
}

pub struct OllamaGenerator {
    http_client: Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    timeout_secs: u64,
}

impl OllamaGenerator {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_tokens,
            timeout_secs,
        })
    }

    pub fn from_config(cfg: &LlmSection) -> Result<Self, LlmError> {
        Self::new(
            cfg.base_url.clone(),
            cfg.model.clone(),
            cfg.max_tokens,
            cfg.timeouts.request,
        )
    }
}

#[async_trait]
impl AnswerGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(collect_response_text(&body))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl OllamaGenerator {
    fn map_transport(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout_secs)
        } else {
            LlmError::Network(e)
        }
    }
}
