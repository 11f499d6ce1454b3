//! Public entry for the mr-reviewer pipeline.
//!
//! Single high-level function to review one Merge Request:
//!
//! 1) **Configuration**: resolve `<prefix>_*` variables for the reviewer
//!    kind against compiled-in defaults (a missing API key stops here, before
//!    any network call)
//! 2) **Prompt**: template + `Title`/`Author` (+ `Description`) + fenced diff
//! 3) **Provider**: one request through `ai-llm-service`
//! 4) **Threads**: structured kind only: parse `{comment, threads}` and apply
//!    the line-number correction
//!
//! The pipeline uses `tracing` for logging and avoids `async-trait` and
//! heap trait objects. It relies on plain `async fn` and enum dispatch over
//! thin provider clients.

pub mod errors;
pub mod review;
pub mod reviewer;
pub mod types;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use errors::MrResult;
use reviewer::ReviewerConfig;

/// Resolve config, assemble the prompt, call the provider, and (for the
/// structured kind) normalize threads.
///
/// # Errors
/// - configuration errors (missing key, bad endpoint) before any request
/// - transport / response-shape errors from the provider
/// - output parse errors for the structured kind
pub async fn run_review(
    req: &ReviewRequest,
    kind: ReviewerKind,
    cancel: &CancellationToken,
) -> MrResult<ReviewResult> {
    debug!(%kind, "resolve reviewer config");
    let cfg = ReviewerConfig::resolve(&req.vars, kind)?;
    review::review_with_config(req, cfg, cancel).await
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use errors::{Error, OutputParseError};
pub use reviewer::ReviewerKind;
pub use types::{CommentThread, ReviewRequest, ReviewResult};
