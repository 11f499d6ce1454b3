//! Structured answer parsing and line-number correction.
//!
//! The structured reviewer answers with `{comment, threads[]}`. The prompt's
//! hunk-counting rules make the model report line numbers one below what the
//! code host expects, so every positive `new_line`/`old_line` is bumped by one,
//! exactly once, each field independently. Zero and absent values pass through.
//!
//! Paths and lines are not checked against the diff.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::OutputParseError;
use crate::types::{CommentThread, ReviewResult};

#[derive(Debug, Deserialize)]
struct StructuredAnswer {
    #[serde(default)]
    comment: String,
    #[serde(default)]
    threads: Option<Vec<CommentThread>>,
}

/// Parses the model's answer and applies the line correction.
///
/// # Errors
/// [`OutputParseError`] with the raw text when the answer is not the expected JSON.
pub fn normalize(raw: &str) -> Result<ReviewResult, OutputParseError> {
    let json = unwrap_answer(raw);
    let answer: StructuredAnswer =
        serde_json::from_str(json).map_err(|source| OutputParseError {
            raw: raw.to_string(),
            source,
        })?;

    let mut threads = answer.threads.unwrap_or_default();
    for t in threads.iter_mut() {
        shift_line(&mut t.new_line);
        shift_line(&mut t.old_line);
        if !t.has_path() {
            warn!(body_len = t.body.len(), "thread without old_path/new_path");
        }
    }

    debug!(
        threads = threads.len(),
        line_level = threads.iter().filter(|t| t.is_line_level()).count(),
        "structured answer normalized"
    );

    Ok(ReviewResult {
        comment: answer.comment,
        threads: Some(threads),
    })
}

fn shift_line(line: &mut Option<i64>) {
    // i64::MAX has no successor; it is left as is
    if let Some(n) = line.as_mut().filter(|n| **n > 0) {
        *n = n.saturating_add(1);
    }
}

/// Strips one surrounding ```` ``` ```` fence (with optional language tag) or
/// `<code>` wrapper.
fn unwrap_answer(raw: &str) -> &str {
    let s = raw.trim();

    if let Some(inner) = s
        .strip_prefix("<code>")
        .and_then(|r| r.strip_suffix("</code>"))
    {
        return inner.trim();
    }

    if let Some(rest) = s.strip_prefix("```") {
        if let Some(body) = rest.strip_suffix("```") {
            // drop the info string (`json`, `JSON`, ...) up to the first newline
            let body = match body.split_once('\n') {
                Some((info, tail)) if !info.trim_start().starts_with('{') => tail,
                _ => body,
            };
            return body.trim();
        }
    }

    s
}
