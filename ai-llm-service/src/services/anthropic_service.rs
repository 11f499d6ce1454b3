//! Anthropic Messages API service.
//!
//! - POST `{endpoint}` (default `https://api.anthropic.com/v1/messages`)
//! - Auth: `x-api-key: <key>` plus `anthropic-version: <version>`
//! - Body: `{ model, max_tokens, messages: [{ role: "user", content: [{ type: "text", text }] }] }`
//! - Text: `content[0].text`

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    config::{
        default_config::{ANTHROPIC_MAX_TOKENS, ANTHROPIC_VERSION}, llm_model_config::LlmModelConfig,
        llm_provider::LlmProvider,
    },
    error_handler::{AiLlmError, ConfigError, MissingField, ResponseShapeError, Result},
    services::http::{build_client, secret_header, send_json},
};

const API_KEY_HEADER: &str = "x-api-key";
const VERSION_HEADER: &str = "anthropic-version";

/// Thin client for the Anthropic Messages API.
#[derive(Debug)]
pub struct AnthropicService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
}

impl AnthropicService {
    /// Creates a new [`AnthropicService`].
    ///
    /// A config built by hand without `max_tokens` / `api_version` gets
    /// [`ANTHROPIC_MAX_TOKENS`] / [`ANTHROPIC_VERSION`].
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Anthropic {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let version = cfg.api_version.as_deref().unwrap_or(ANTHROPIC_VERSION);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            secret_header(API_KEY_HEADER, &cfg.api_key)?,
        );
        headers.insert(
            HeaderName::from_static(VERSION_HEADER),
            HeaderValue::from_str(version).map_err(|_| {
                AiLlmError::from(ConfigError::InvalidHeader {
                    header: VERSION_HEADER,
                })
            })?,
        );
        let client = build_client(&cfg, headers)?;

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            anthropic_version = %version,
            timeout_secs = cfg.timeout_secs,
            "AnthropicService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Sends `prompt` as a single user text block.
    ///
    /// # Errors
    /// - `Transport` for non-2xx statuses and network failures
    /// - `ResponseShape::Decode` for malformed JSON
    /// - `ResponseShape::Missing(Content)` if `content[]` is empty
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let started = Instant::now();
        let body = MessagesRequest::new(&self.cfg, prompt);

        let request = self.client.post(&self.cfg.endpoint).json(&body);
        let out: MessagesResponse = send_json(
            LlmProvider::Anthropic,
            request,
            &self.cfg.endpoint,
            &self.cfg,
            "`content[0].text`",
            cancel,
        )
        .await?;

        let text = extract_text(out)?;

        info!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            latency_ms = started.elapsed().as_millis(),
            "message completed"
        );

        Ok(text)
    }
}

fn extract_text(resp: MessagesResponse) -> Result<String> {
    let Some(first) = resp.content.into_iter().next() else {
        return Err(ResponseShapeError::missing(
            LlmProvider::Anthropic,
            MissingField::Content,
        ));
    };
    Ok(first.text.unwrap_or_default())
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [UserMessage<'a>; 1],
}

impl<'a> MessagesRequest<'a> {
    fn new(cfg: &'a LlmModelConfig, prompt: &'a str) -> Self {
        Self {
            model: &cfg.model,
            max_tokens: cfg.max_tokens.unwrap_or(ANTHROPIC_MAX_TOKENS),
            messages: [UserMessage {
                role: "user",
                content: [TextBlock {
                    kind: "text",
                    text: prompt,
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: [TextBlock<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextBlock<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
