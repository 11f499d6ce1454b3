//! Provider services and the enum that dispatches between them.
//!
//! Every service honours the same contract: one prompt in, one review text
//! out, one HTTP request in between. Dispatch is a closed enum; no trait
//! objects, no `async-trait`.

pub mod anthropic_service;
pub mod deepseek_service;
pub mod gemini_service;
mod http;
pub mod open_ai_service;

use tokio_util::sync::CancellationToken;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::Result,
};

use self::{
    anthropic_service::AnthropicService, deepseek_service::DeepSeekService,
    gemini_service::GeminiService, open_ai_service::OpenAiService,
};

/// A ready-to-use client for whichever provider the config names.
#[derive(Debug)]
pub enum LlmService {
    OpenAi(OpenAiService),
    Anthropic(AnthropicService),
    DeepSeek(DeepSeekService),
    Gemini(GeminiService),
}

impl LlmService {
    /// Builds the service matching `cfg.provider`.
    ///
    /// # Errors
    /// Propagates the constructor error of the selected service.
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::OpenAi => LlmService::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Anthropic => LlmService::Anthropic(AnthropicService::new(cfg)?),
            LlmProvider::DeepSeek => LlmService::DeepSeek(DeepSeekService::new(cfg)?),
            LlmProvider::Gemini => LlmService::Gemini(GeminiService::new(cfg)?),
        })
    }

    /// Which provider this service talks to.
    pub fn provider(&self) -> LlmProvider {
        match self {
            LlmService::OpenAi(_) => LlmProvider::OpenAi,
            LlmService::Anthropic(_) => LlmProvider::Anthropic,
            LlmService::DeepSeek(_) => LlmProvider::DeepSeek,
            LlmService::Gemini(_) => LlmProvider::Gemini,
        }
    }

    /// Submits `prompt` and returns the generated review text.
    ///
    /// Single attempt. Any failure is returned as is; retry and fallback
    /// policy belongs to the caller.
    pub async fn submit(&self, prompt: &str, cancel: &CancellationToken) -> Result<String> {
        match self {
            LlmService::OpenAi(s) => s.generate(prompt, cancel).await,
            LlmService::Anthropic(s) => s.generate(prompt, cancel).await,
            LlmService::DeepSeek(s) => s.generate(prompt, cancel).await,
            LlmService::Gemini(s) => s.generate(prompt, cancel).await,
        }
    }
}
