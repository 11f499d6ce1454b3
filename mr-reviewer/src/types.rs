//! Invocation input and review output.
//!
//! These mirror the host's fixed contract: the request arrives as JSON with
//! the diff encoded as base64 bytes, and the result leaves as JSON with absent
//! thread fields omitted rather than zeroed.

use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};

/// One merge request to review, plus the caller's configuration variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewRequest {
    pub title: String,
    /// May be empty; omitted from the prompt when it is.
    #[serde(default)]
    pub description: String,
    pub author: String,
    /// Raw unified diff. Passed to the model verbatim.
    #[serde(default, deserialize_with = "base64_bytes")]
    pub diffs: Vec<u8>,
    /// `<prefix>_<setting>` variables (API key, model, prompt, ...).
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

/// Final review: a summary comment and, for the structured reviewer, threads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<Vec<CommentThread>>,
}

impl ReviewResult {
    /// Free-text result without threads.
    pub fn comment(comment: String) -> Self {
        Self {
            comment,
            threads: None,
        }
    }
}

/// One inline annotation on the diff.
///
/// - added line: `new_line` only
/// - removed line: `old_line` only
/// - unchanged line: both
/// - neither: file-level comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default)]
    pub body: String,
}

impl CommentThread {
    /// True when the thread points at a line rather than a whole file.
    pub fn is_line_level(&self) -> bool {
        self.new_line.is_some() || self.old_line.is_some()
    }

    /// True when at least one side of the file is named.
    pub fn has_path(&self) -> bool {
        self.new_path.is_some() || self.old_path.is_some()
    }
}

fn base64_bytes<'de, D>(de: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded = Option::<String>::deserialize(de)?;
    match encoded {
        None => Ok(Vec::new()),
        Some(s) => STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_decodes_base64_diff_and_defaults() {
        let req: ReviewRequest = serde_json::from_str(
            r#"{"title":"Fix","author":"ann","diffs":"LS0tIGEKKysrIGIK"}"#,
        )
        .unwrap();
        assert_eq!(req.diffs, b"--- a\n+++ b\n");
        assert_eq!(req.description, "");
        assert!(req.vars.is_empty());
    }

    #[test]
    fn null_diff_is_empty() {
        let req: ReviewRequest =
            serde_json::from_str(r#"{"title":"t","author":"a","diffs":null}"#).unwrap();
        assert!(req.diffs.is_empty());
    }

    #[test]
    fn bad_base64_is_rejected() {
        let res = serde_json::from_str::<ReviewRequest>(
            r#"{"title":"t","author":"a","diffs":"%%%"}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn absent_thread_fields_are_omitted() {
        let out = ReviewResult {
            comment: "ok".into(),
            threads: Some(vec![CommentThread {
                new_line: Some(10),
                old_line: None,
                new_path: Some("a.go".into()),
                old_path: None,
                body: "fix".into(),
            }]),
        };
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"comment":"ok","threads":[{"new_line":10,"new_path":"a.go","body":"fix"}]}"#
        );
    }

    #[test]
    fn free_text_result_has_no_threads_key() {
        let out = ReviewResult::comment("text".into());
        assert_eq!(serde_json::to_string(&out).unwrap(), r#"{"comment":"text"}"#);
    }
}
