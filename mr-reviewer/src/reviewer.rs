//! Reviewer kinds and per-call configuration.
//!
//! A kind fixes the variable prefix, the wire provider, the default prompt,
//! and whether the model answers with structured threads. Two kinds share the
//! `reviewer` prefix and the OpenAI wire; they differ only in prompt and output.

use std::collections::HashMap;
use std::str::FromStr;

use ai_llm_service::{
    ConfigError, LlmModelConfig, LlmProvider, ProviderDefaults, config::default_config::string_or,
    resolve_model_config,
};

use crate::errors::MrResult;
use crate::review::prompt::{DEFAULT_PROMPT, DEFAULT_THREADS_PROMPT, OPENAI_DEFAULT_PROMPT};

/// Which reviewer runs: the wire it talks, its `<prefix>_*` variables and
/// whether its answer is parsed into threads.
///
/// Parsed from `openai`, `openai-threads`, `claude`, `deepseek`, `gemini`
/// (case-insensitive, `_` accepted for `-`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewerKind {
    /// Free-text review over the OpenAI Responses API.
    OpenAi,
    /// Structured `{comment, threads}` review over the OpenAI Responses API.
    OpenAiThreads,
    /// Free-text review over the Anthropic Messages API (`claude_reviewer_*`).
    Claude,
    /// Free-text review over DeepSeek chat completions (`deepseek_reviewer_*`).
    DeepSeek,
    /// Free-text review over Gemini `generateContent` (`gemini_reviewer_*`).
    Gemini,
}

impl ReviewerKind {
    pub const ALL: [ReviewerKind; 5] = [
        ReviewerKind::OpenAi,
        ReviewerKind::OpenAiThreads,
        ReviewerKind::Claude,
        ReviewerKind::DeepSeek,
        ReviewerKind::Gemini,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReviewerKind::OpenAi => "openai",
            ReviewerKind::OpenAiThreads => "openai-threads",
            ReviewerKind::Claude => "claude",
            ReviewerKind::DeepSeek => "deepseek",
            ReviewerKind::Gemini => "gemini",
        }
    }

    /// Prefix of every configuration variable for this kind.
    pub fn var_prefix(self) -> &'static str {
        match self {
            ReviewerKind::OpenAi | ReviewerKind::OpenAiThreads => "reviewer",
            ReviewerKind::Claude => "claude_reviewer",
            ReviewerKind::DeepSeek => "deepseek_reviewer",
            ReviewerKind::Gemini => "gemini_reviewer",
        }
    }

    pub fn provider(self) -> LlmProvider {
        match self {
            ReviewerKind::OpenAi | ReviewerKind::OpenAiThreads => LlmProvider::OpenAi,
            ReviewerKind::Claude => LlmProvider::Anthropic,
            ReviewerKind::DeepSeek => LlmProvider::DeepSeek,
            ReviewerKind::Gemini => LlmProvider::Gemini,
        }
    }

    pub fn default_prompt(self) -> &'static str {
        match self {
            ReviewerKind::OpenAi => OPENAI_DEFAULT_PROMPT,
            ReviewerKind::OpenAiThreads => DEFAULT_THREADS_PROMPT,
            ReviewerKind::Claude | ReviewerKind::DeepSeek | ReviewerKind::Gemini => DEFAULT_PROMPT,
        }
    }

    /// Whether the model output is parsed into threads.
    pub fn is_structured(self) -> bool {
        matches!(self, ReviewerKind::OpenAiThreads)
    }
}

impl std::fmt::Display for ReviewerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ReviewerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnsupportedProvider(s.to_string()))
    }
}

/// Everything one review call needs: wire settings plus the prompt template.
#[derive(Debug, Clone)]
pub struct ReviewerConfig {
    pub kind: ReviewerKind,
    pub llm: LlmModelConfig,
    pub prompt: String,
}

impl ReviewerConfig {
    /// Resolves the config for `kind` from `vars`, using the kind's compiled-in
    /// defaults for anything absent.
    ///
    /// # Errors
    /// Fails with a configuration error when `<prefix>_api_key` is missing or
    /// the endpoint is not http(s).
    pub fn resolve(vars: &HashMap<String, String>, kind: ReviewerKind) -> MrResult<Self> {
        Self::resolve_with(
            vars,
            kind,
            ProviderDefaults::for_provider(kind.provider()),
            kind.default_prompt(),
        )
    }

    /// Same as [`ReviewerConfig::resolve`] with explicit default tables.
    pub fn resolve_with(
        vars: &HashMap<String, String>,
        kind: ReviewerKind,
        defaults: &ProviderDefaults,
        default_prompt: &str,
    ) -> MrResult<Self> {
        let prefix = kind.var_prefix();
        let llm = resolve_model_config(vars, prefix, defaults)?;
        let prompt = string_or(vars, prefix, "prompt", default_prompt);
        Ok(Self { kind, llm, prompt })
    }
}
