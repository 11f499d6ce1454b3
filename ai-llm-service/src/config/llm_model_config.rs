use crate::config::llm_provider::LlmProvider;

/// Resolved wire settings for a single review call.
///
/// Built once per call by [`resolve_model_config`](crate::config::default_config::resolve_model_config)
/// and never mutated afterwards.
///
/// # Fields
///
/// - `provider`: which wire protocol to speak.
/// - `model`: model identifier (e.g., `"gpt-5.1-codex-mini"`, `"deepseek-chat"`).
/// - `endpoint`: full URL, or for Gemini the `models/` prefix the model is appended to.
/// - `api_key`: credential, always present once resolved.
/// - `max_tokens`: output limit, sent only by providers that accept it.
/// - `api_version`: protocol version header value (Anthropic).
/// - `timeout_secs`: client-side request timeout.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Protocol version string (e.g., `anthropic-version`).
    pub api_version: Option<String>,

    /// Request timeout (in seconds).
    pub timeout_secs: u64,
}

// Hand-written so the key never ends up in logs.
impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .field("max_tokens", &self.max_tokens)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
