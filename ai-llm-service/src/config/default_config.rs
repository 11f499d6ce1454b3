//! Default wire settings per provider and the resolver that merges them with
//! caller-supplied variables.
//!
//! Variables follow the pattern `<prefix>_<setting>`; the prefix belongs to the
//! caller (e.g., `reviewer`, `claude_reviewer`). Recognised settings:
//!
//! - `api_key` (required; empty counts as missing)
//! - `model`, `endpoint`
//! - `max_tokens` (providers that send it; non-numeric falls back to default)
//! - `anthropic_version` (Anthropic only)
//! - `timeout_secs` (non-numeric or zero falls back to default)
//!
//! Resolution is a pure lookup: no environment reads, no I/O.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{ConfigError, Result, validate_http_endpoint},
};

/// Client timeout used when `<prefix>_timeout_secs` is absent or invalid.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// The Messages API rejects requests without these two.
pub const ANTHROPIC_MAX_TOKENS: u32 = 1024;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Compiled-in defaults for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub provider: LlmProvider,
    pub model: &'static str,
    pub endpoint: &'static str,
    /// `Some` only for providers whose request carries `max_tokens`.
    pub max_tokens: Option<u32>,
    /// `Some` only for providers that send a protocol version header.
    pub api_version: Option<&'static str>,
    pub timeout_secs: u64,
}

pub const OPENAI_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: LlmProvider::OpenAi,
    model: "gpt-5.1-codex-mini",
    endpoint: "https://api.openai.com/v1/responses",
    max_tokens: None,
    api_version: None,
    timeout_secs: DEFAULT_TIMEOUT_SECS,
};

pub const ANTHROPIC_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: LlmProvider::Anthropic,
    model: "claude-3-5-sonnet-20240620",
    endpoint: "https://api.anthropic.com/v1/messages",
    max_tokens: Some(ANTHROPIC_MAX_TOKENS),
    api_version: Some(ANTHROPIC_VERSION),
    timeout_secs: DEFAULT_TIMEOUT_SECS,
};

pub const DEEPSEEK_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: LlmProvider::DeepSeek,
    model: "deepseek-chat",
    endpoint: "https://api.deepseek.com/chat/completions",
    max_tokens: Some(1024),
    api_version: None,
    timeout_secs: DEFAULT_TIMEOUT_SECS,
};

pub const GEMINI_DEFAULTS: ProviderDefaults = ProviderDefaults {
    provider: LlmProvider::Gemini,
    model: "gemini-pro",
    endpoint: "https://generativelanguage.googleapis.com/v1beta/models/",
    max_tokens: None,
    api_version: None,
    timeout_secs: DEFAULT_TIMEOUT_SECS,
};

impl ProviderDefaults {
    /// Default table for `provider`.
    pub fn for_provider(provider: LlmProvider) -> &'static ProviderDefaults {
        match provider {
            LlmProvider::OpenAi => &OPENAI_DEFAULTS,
            LlmProvider::Anthropic => &ANTHROPIC_DEFAULTS,
            LlmProvider::DeepSeek => &DEEPSEEK_DEFAULTS,
            LlmProvider::Gemini => &GEMINI_DEFAULTS,
        }
    }
}

/// Resolves an [`LlmModelConfig`] from `vars` under `prefix`, falling back to
/// `defaults` for every optional setting.
///
/// # Errors
/// - [`ConfigError::MissingVar`] if `<prefix>_api_key` is absent or empty
/// - [`ConfigError::InvalidEndpoint`] if the endpoint is not http(s)
pub fn resolve_model_config(
    vars: &HashMap<String, String>,
    prefix: &str,
    defaults: &ProviderDefaults,
) -> Result<LlmModelConfig> {
    let key_var = format!("{prefix}_api_key");
    let api_key = match vars.get(&key_var) {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => return Err(ConfigError::MissingVar(key_var).into()),
    };

    let model = string_or(vars, prefix, "model", defaults.model);

    let endpoint_var = format!("{prefix}_endpoint");
    let endpoint = vars
        .get(&endpoint_var)
        .cloned()
        .unwrap_or_else(|| defaults.endpoint.to_string());
    validate_http_endpoint(&endpoint_var, &endpoint)?;

    let max_tokens = defaults
        .max_tokens
        .map(|d| number_or(vars, prefix, "max_tokens", d));

    let api_version = defaults
        .api_version
        .map(|d| string_or(vars, prefix, "anthropic_version", d));

    let timeout_secs = match number_or(vars, prefix, "timeout_secs", defaults.timeout_secs) {
        0 => defaults.timeout_secs,
        n => n,
    };

    debug!(
        provider = %defaults.provider,
        %prefix,
        %model,
        %endpoint,
        ?max_tokens,
        ?api_version,
        timeout_secs,
        "provider config resolved"
    );

    Ok(LlmModelConfig {
        provider: defaults.provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        api_version,
        timeout_secs,
    })
}

/// `<prefix>_<name>` as supplied, or `default` when the key is absent.
///
/// A present-but-empty value is returned as is.
pub fn string_or(vars: &HashMap<String, String>, prefix: &str, name: &str, default: &str) -> String {
    vars.get(&format!("{prefix}_{name}"))
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Numeric `<prefix>_<name>`; absent or unparsable values yield `default`.
fn number_or<N>(vars: &HashMap<String, String>, prefix: &str, name: &str, default: N) -> N
where
    N: std::str::FromStr,
{
    vars.get(&format!("{prefix}_{name}"))
        .and_then(|v| v.trim().parse::<N>().ok())
        .unwrap_or(default)
}
