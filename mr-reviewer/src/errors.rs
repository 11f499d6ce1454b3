//! Crate-wide error hierarchy for mr-reviewer.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Provider failures keep their `ai-llm-service` taxonomy untouched.
//! - No dynamic dispatch, no async-trait, ergonomic `?` via `From` impls.

use ai_llm_service::{AiLlmError, ConfigError};
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type MrResult<T> = Result<T, Error>;

/// Root error type for the mr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration, transport, or response-shape failure from the provider layer.
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// The structured reviewer's answer was not the expected JSON document.
    #[error(transparent)]
    Output(#[from] OutputParseError),

    /// The invocation document itself could not be read.
    #[error("[MR Reviewer] invalid invocation input: {0}")]
    Input(String),
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Llm(AiLlmError::Config(e))
    }
}

/// Model output that failed to parse as `{comment, threads}`.
///
/// Carries the raw text so the failing answer can be inspected.
#[derive(Debug, Error)]
#[error("[MR Reviewer] failed to parse model output: {source}; output: {raw}")]
pub struct OutputParseError {
    /// Text exactly as returned by the provider.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}
