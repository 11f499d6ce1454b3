//! Gemini generate-content service.
//!
//! - POST `{endpoint}{model}:generateContent?key=<key>`
//!   (default endpoint `https://generativelanguage.googleapis.com/v1beta/models/`)
//! - Auth: API key in the query string; no auth header
//! - Body: `{ contents: [{ parts: [{ text: <prompt> }] }] }`
//! - Text: `candidates[0].content.parts[0].text`

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, MissingField, ResponseShapeError, Result},
    services::http::{build_client, send_json},
};

/// Thin client for the Gemini `generateContent` API.
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`]. The model is part of the URL path.
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Gemini {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let client = build_client(&cfg, HeaderMap::new())?;
        let url_generate = generate_url(&cfg.endpoint, &cfg.model);

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs,
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Sends `prompt` as the single part of a single content entry.
    ///
    /// # Errors
    /// - `Transport` for non-2xx statuses and network failures
    /// - `ResponseShape::Decode` for malformed JSON
    /// - `ResponseShape::Missing(Candidates)` / `Missing(Parts)` for empty lists
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        let started = Instant::now();
        let body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let request = self
            .client
            .post(&self.url_generate)
            .query(&[("key", self.cfg.api_key.as_str())])
            .json(&body);
        let log_url = format!("{}?key=", self.url_generate);
        let out: GenerateContentResponse = send_json(
            LlmProvider::Gemini,
            request,
            &log_url,
            &self.cfg,
            "`candidates[0].content.parts[0].text`",
            cancel,
        )
        .await?;

        let text = extract_text(out)?;

        info!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            latency_ms = started.elapsed().as_millis(),
            "generate content completed"
        );

        Ok(text)
    }
}

/// `<endpoint><model>:generateContent`, concatenated verbatim.
fn generate_url(endpoint: &str, model: &str) -> String {
    format!("{endpoint}{model}:generateContent")
}

fn extract_text(resp: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(ResponseShapeError::missing(
            LlmProvider::Gemini,
            MissingField::Candidates,
        ));
    };
    let Some(part) = candidate.content.parts.into_iter().next() else {
        return Err(ResponseShapeError::missing(
            LlmProvider::Gemini,
            MissingField::Parts,
        ));
    };
    Ok(part.text.unwrap_or_default())
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}
