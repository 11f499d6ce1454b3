//! Provider adapters for merge-request review models.
//!
//! - [`config`]: wire settings, per-provider default tables and the resolver
//!   that merges them with caller variables
//! - [`services`]: one thin `reqwest` client per wire protocol, dispatched by
//!   [`services::LlmService`]
//! - [`error_handler`]: the unified [`AiLlmError`] taxonomy
//! - [`telemetry`]: a `tracing-subscriber` layer for binaries
//!
//! ```no_run
//! # async fn run() -> ai_llm_service::Result<()> {
//! use std::collections::HashMap;
//! use ai_llm_service::{LlmService, ProviderDefaults, LlmProvider, resolve_model_config};
//! use tokio_util::sync::CancellationToken;
//!
//! let vars = HashMap::from([("reviewer_api_key".to_string(), "sk-...".to_string())]);
//! let cfg = resolve_model_config(
//!     &vars,
//!     "reviewer",
//!     ProviderDefaults::for_provider(LlmProvider::OpenAi),
//! )?;
//! let text = LlmService::new(cfg)?
//!     .submit("Review this diff", &CancellationToken::new())
//!     .await?;
//! # let _ = text;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::{
    default_config::{ProviderDefaults, resolve_model_config},
    llm_model_config::LlmModelConfig,
    llm_provider::LlmProvider,
};
pub use error_handler::{
    AiLlmError, ConfigError, MissingField, ResponseShapeError, Result, TransportError,
};
pub use services::LlmService;
