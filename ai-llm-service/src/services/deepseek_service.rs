//! Chat-completions service (DeepSeek and other OpenAI-compatible endpoints).
//!
//! - POST `{endpoint}` (default `https://api.deepseek.com/chat/completions`)
//! - Auth: `Authorization: Bearer <key>`
//! - Body: `{ model, max_tokens?, messages: [{ role: "user", content: <prompt> }] }`
//! - Text: `choices[0].message.content`

use std::time::Instant;

use reqwest::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, MissingField, ResponseShapeError, Result},
    services::http::{build_client, secret_header, send_json},
};

/// Thin client for a chat-completions endpoint.
#[derive(Debug)]
pub struct DeepSeekService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
}

impl DeepSeekService {
    /// Creates a new [`DeepSeekService`].
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::DeepSeek {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            secret_header("authorization", &format!("Bearer {}", cfg.api_key))?,
        );
        let client = build_client(&cfg, headers)?;

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            "DeepSeekService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Performs a **non-streaming** chat completion with a single user message.
    ///
    /// # Errors
    /// - `Transport` for non-2xx statuses and network failures
    /// - `ResponseShape::Decode` for malformed JSON
    /// - `ResponseShape::Missing(Choices)` if no choices are returned
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt);

        let request = self.client.post(&self.cfg.endpoint).json(&body);
        let out: ChatCompletionResponse = send_json(
            LlmProvider::DeepSeek,
            request,
            &self.cfg.endpoint,
            &self.cfg,
            "`choices[0].message.content`",
            cancel,
        )
        .await?;

        let content = extract_text(out)?;

        info!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );

        Ok(content)
    }
}

fn extract_text(resp: ChatCompletionResponse) -> Result<String> {
    let Some(first) = resp.choices.into_iter().next() else {
        return Err(ResponseShapeError::missing(
            LlmProvider::DeepSeek,
            MissingField::Choices,
        ));
    };
    Ok(first.message.content.unwrap_or_default())
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            // zero means "provider default"
            max_tokens: cfg.max_tokens.filter(|n| *n > 0),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatMessageOut,
}

#[derive(Debug, Default, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: Option<String>,
}
