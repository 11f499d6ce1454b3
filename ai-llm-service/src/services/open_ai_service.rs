//! OpenAI Responses API service.
//!
//! - POST `{endpoint}` (default `https://api.openai.com/v1/responses`)
//! - Auth: `Authorization: Bearer <key>`
//! - Body: `{ "model": ..., "input": <prompt> }`
//! - Text: first `output[]` item with `type == "message"`, its `content[0].text`
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAi`
//! - the key must be encodable as a header value

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

/// Thin client for the OpenAI Responses API.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from a resolved config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not OpenAI
    /// - [`ConfigError::InvalidHeader`] if the key is not a valid header value
    /// - [`crate::error_handler::TransportError::ClientBuild`] if the client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::OpenAi {
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
            "OpenAiService initialized"
        );

        Ok(Self { client, cfg })
    }

    /// Sends `prompt` as the `input` of one non-streaming response request.
    ///
    /// # Errors
    /// - `Transport` for non-2xx statuses and network failures
    /// - `ResponseShape::Decode` for malformed JSON
    /// - `ResponseShape::Missing(Results)` if no `message` item is present
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let started = Instant::now();
        let body = ResponsesRequest {
            model: &self.cfg.model,
            input: prompt,
        };

        let request = self.client.post(&self.cfg.endpoint).json(&body);
        let out: ResponsesResponse = send_json(
            LlmProvider::OpenAi,
            request,
            &self.cfg.endpoint,
            &self.cfg,
            "`output[type=message].content[0].text`",
            cancel,
        )
        .await?;

        let text = extract_text(out)?;

        info!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            latency_ms = started.elapsed().as_millis(),
            "response completed"
        );

        Ok(text)
    }
}

/// Pulls the review text out of a decoded envelope.
///
/// Items of other types (`reasoning`, tool calls, ...) are skipped. A `message`
/// item without a text part yields an empty string.
fn extract_text(resp: ResponsesResponse) -> Result<String> {
    let Some(message) = resp.output.into_iter().find(|o| o.kind == "message") else {
        return Err(ResponseShapeError::missing(
            LlmProvider::OpenAi,
            MissingField::Results,
        ));
    };

    Ok(message
        .content
        .into_iter()
        .next()
        .and_then(|c| c.text)
        .unwrap_or_default())
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::AiLlmError;

    fn parse(s: &str) -> ResponsesResponse {
        serde_json::from_str(s).unwrap()
    }

    #[test]
    fn skips_non_message_items() {
        let out = parse(
            r#"{"id":"resp_1","output":[
                {"type":"reasoning","summary":[]},
                {"type":"message","role":"assistant","content":[{"type":"output_text","text":"LGTM"}]}
            ]}"#,
        );
        assert_eq!(extract_text(out).unwrap(), "LGTM");
    }

    #[test]
    fn no_message_means_no_results() {
        let out = parse(r#"{"output":[{"type":"reasoning"}]}"#);
        let err = extract_text(out).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::ResponseShape(ResponseShapeError::Missing {
                field: MissingField::Results,
                ..
            })
        ));
    }

    #[test]
    fn request_shape() {
        let body = ResponsesRequest {
            model: "m",
            input: "p",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"model": "m", "input": "p"})
        );
    }
}
