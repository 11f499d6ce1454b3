//! Unified error handling for `ai-llm-service`.
//!
//! This module exposes a single top-level error type [`AiLlmError`] for the whole
//! library, and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`TransportError`], [`ResponseShapeError`]). Every error is terminal for the
//! current call: nothing in this crate retries.
//!
//! All messages include the prefix `[AI LLM Service]` to simplify attribution in logs.

use std::time::Duration;

use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-llm-service` crate.
///
/// Variants wrap domain-specific enums. Prefer adding new sub-enums for
/// distinct domains instead of growing this type indefinitely.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration could not be resolved; no network call was attempted.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP call failed or returned a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not the envelope the provider documents.
    #[error(transparent)]
    ResponseShape(#[from] ResponseShapeError),

    /// The caller cancelled the request before it completed.
    #[error("[AI LLM Service] request cancelled")]
    Cancelled,
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Errors raised while resolving a provider configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is missing or empty.
    #[error("[AI LLM Service] {} is not provided", .0.to_uppercase())]
    MissingVar(String),

    /// Endpoint does not use an http(s) scheme.
    #[error("[AI LLM Service] invalid endpoint in {var}: {value}")]
    InvalidEndpoint {
        /// Variable the endpoint was read from (or `default`).
        var: String,
        /// Offending value.
        value: String,
    },

    /// A value could not be encoded as an HTTP header.
    #[error("[AI LLM Service] invalid header value for {header}")]
    InvalidHeader {
        /// Header name.
        header: &'static str,
    },

    /// Unknown reviewer/provider name.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/* ------------------------------------------------------------------------- */
/* Transport errors                                                          */
/* ------------------------------------------------------------------------- */

/// Failures of the single HTTP exchange.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransportError {
    /// Upstream answered outside the 200..=299 band.
    #[error("[AI LLM Service] {provider} request failed with status {status}: {body}")]
    HttpStatus {
        provider: LlmProvider,
        /// Numeric HTTP status code.
        status: u16,
        /// Request URL with credentials redacted.
        url: String,
        /// Raw response body, untouched.
        body: String,
    },

    /// Connect/DNS/reset/body-read failure.
    #[error("[AI LLM Service] {provider} transport error: {source}")]
    Network {
        provider: LlmProvider,
        #[source]
        source: reqwest::Error,
    },

    /// The client timeout elapsed.
    #[error("[AI LLM Service] {provider} request timed out after {after:?}")]
    Timeout {
        provider: LlmProvider,
        after: Duration,
    },

    /// The HTTP client could not be constructed.
    #[error("[AI LLM Service] failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl TransportError {
    /// Status code carried by [`TransportError::HttpStatus`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Response shape errors                                                     */
/* ------------------------------------------------------------------------- */

/// The text-bearing part of a response envelope that was expected but absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// No `output[]` entry with `type == "message"`.
    Results,
    /// Empty `content[]`.
    Content,
    /// Empty `choices[]`.
    Choices,
    /// Empty `candidates[]`.
    Candidates,
    /// Empty `candidates[0].content.parts[]`.
    Parts,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MissingField::Results => "no results",
            MissingField::Content => "no content",
            MissingField::Choices => "no choices",
            MissingField::Candidates => "no candidates",
            MissingField::Parts => "no parts",
        };
        f.write_str(s)
    }
}

/// Errors describing which structural expectation of the envelope failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ResponseShapeError {
    /// Body was not JSON, or not the documented envelope.
    #[error("[AI LLM Service] {provider} decode error: {reason}")]
    Decode {
        provider: LlmProvider,
        reason: String,
    },

    /// The envelope parsed but the relevant list was empty.
    #[error("[AI LLM Service] {provider}: {field} in response")]
    Missing {
        provider: LlmProvider,
        field: MissingField,
    },
}

impl ResponseShapeError {
    pub(crate) fn missing(provider: LlmProvider, field: MissingField) -> AiLlmError {
        ResponseShapeError::Missing { provider, field }.into()
    }
}

/* ------------------------------------------------------------------------- */
/* Helpers                                                                   */
/* ------------------------------------------------------------------------- */

/// Maps a `reqwest` failure of the send/read phase into a [`TransportError`].
pub(crate) fn transport_error(
    provider: LlmProvider,
    timeout: Duration,
    e: reqwest::Error,
) -> AiLlmError {
    if e.is_timeout() {
        TransportError::Timeout {
            provider,
            after: timeout,
        }
        .into()
    } else {
        TransportError::Network {
            provider,
            source: e,
        }
        .into()
    }
}

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidEndpoint`] when the scheme is missing.
pub fn validate_http_endpoint(var: &str, value: &str) -> Result<()> {
    let v = value.trim();
    if v.starts_with("http://") || v.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidEndpoint {
            var: var.to_string(),
            value: value.to_string(),
        }
        .into())
    }
}

/// Replaces the value of a `key=` query parameter so URLs are safe to log.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| {
            if pair.starts_with("key=") {
                "key=***".to_string()
            } else {
                pair.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}
