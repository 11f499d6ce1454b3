//! Prompt → provider → (structured only) thread normalization.
//!
//! Logs:
//! - `INFO`: one summary line per review (kind, provider, timing, #threads)
//! - `DEBUG`: prompt size and per-stage timings

pub mod prompt;
pub mod threads;

use std::time::Instant;

use ai_llm_service::LlmService;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::MrResult;
use crate::reviewer::ReviewerConfig;
use crate::types::{ReviewRequest, ReviewResult};
use prompt::build_review_prompt;

/// Runs one review with an already resolved config.
///
/// Exactly one provider call; its failure is the review's failure.
pub async fn review_with_config(
    req: &ReviewRequest,
    cfg: ReviewerConfig,
    cancel: &CancellationToken,
) -> MrResult<ReviewResult> {
    let t0 = Instant::now();
    let kind = cfg.kind;

    let prompt = build_review_prompt(&cfg.prompt, req);
    debug!(
        %kind,
        prompt_len = prompt.len(),
        diff_len = req.diffs.len(),
        has_description = !req.description.is_empty(),
        "prompt assembled"
    );

    let service = LlmService::new(cfg.llm)?;
    let provider = service.provider();

    let t_llm = Instant::now();
    let text = service.submit(&prompt, cancel).await?;
    debug!(
        %kind,
        %provider,
        answer_len = text.len(),
        latency_ms = t_llm.elapsed().as_millis(),
        "provider answered"
    );

    let result = if kind.is_structured() {
        threads::normalize(&text)?
    } else {
        ReviewResult::comment(text)
    };

    info!(
        %kind,
        %provider,
        threads = result.threads.as_ref().map_or(0, Vec::len),
        total_ms = t0.elapsed().as_millis(),
        "review completed"
    );

    Ok(result)
}
