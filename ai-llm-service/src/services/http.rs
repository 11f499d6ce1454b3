//! Shared HTTP plumbing for all provider services.
//!
//! One request per call: send, check the status band, decode the typed
//! envelope. Cancellation races the whole exchange.

use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, ResponseShapeError, Result, TransportError, redact_key,
        transport_error,
    },
};

/// Builds a `reqwest::Client` with the config timeout and the given default headers.
///
/// `Content-Type: application/json` is always added.
pub(crate) fn build_client(cfg: &LlmModelConfig, mut headers: HeaderMap) -> Result<reqwest::Client> {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .default_headers(headers)
        .build()
        .map_err(|e| TransportError::ClientBuild(e).into())
}

/// Encodes a secret as a sensitive header value.
pub(crate) fn secret_header(name: &'static str, value: &str) -> Result<HeaderValue> {
    let mut v = HeaderValue::from_str(value)
        .map_err(|_| AiLlmError::from(ConfigError::InvalidHeader { header: name }))?;
    v.set_sensitive(true);
    Ok(v)
}

/// Sends a prepared request and decodes a `2xx` body into `R`.
///
/// - non-`2xx` → [`TransportError::HttpStatus`] with the raw body, whatever it contains
/// - send/read failure → [`TransportError::Network`] or [`TransportError::Timeout`]
/// - undecodable body → [`ResponseShapeError::Decode`] mentioning `expect`
/// - `cancel` fired first → [`AiLlmError::Cancelled`]
pub(crate) async fn send_json<R>(
    provider: LlmProvider,
    request: reqwest::RequestBuilder,
    url: &str,
    cfg: &LlmModelConfig,
    expect: &'static str,
    cancel: &CancellationToken,
) -> Result<R>
where
    R: DeserializeOwned,
{
    let log_url = redact_key(url);
    debug!(
        %provider,
        model = %cfg.model,
        "POST {}", log_url
    );

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%provider, "request cancelled by caller");
            Err(AiLlmError::Cancelled)
        }
        res = exchange(provider, request, log_url.clone(), cfg, expect) => res,
    }
}

async fn exchange<R>(
    provider: LlmProvider,
    request: reqwest::RequestBuilder,
    url: String,
    cfg: &LlmModelConfig,
    expect: &'static str,
) -> Result<R>
where
    R: DeserializeOwned,
{
    let started = Instant::now();
    let timeout = Duration::from_secs(cfg.timeout_secs);

    let resp = request
        .send()
        .await
        .map_err(|e| transport_error(provider, timeout, e))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| transport_error(provider, timeout, e))?;

    if !status.is_success() {
        error!(
            %provider,
            status = status.as_u16(),
            %url,
            model = %cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "provider returned non-success status"
        );
        return Err(TransportError::HttpStatus {
            provider,
            status: status.as_u16(),
            url,
            body,
        }
        .into());
    }

    serde_json::from_str::<R>(&body).map_err(|e| {
        error!(
            %provider,
            error = %e,
            model = %cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "failed to decode provider response"
        );
        ResponseShapeError::Decode {
            provider,
            reason: format!("serde error: {e}; expected {expect}"),
        }
        .into()
    })
}
