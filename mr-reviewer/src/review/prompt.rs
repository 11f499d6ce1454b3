//! Prompt templates and the assembler.
//!
//! Layout of an assembled prompt:
//!
//! ~~~text
//! <template>
//! Title: <title>
//! Author: <author>
//! Description: <description>      (only when non-empty)
//! # Diff
//! ```<diff bytes>
//! ```
//! ~~~

use crate::types::ReviewRequest;

pub const OPENAI_DEFAULT_PROMPT: &str = "
You are Reviewer of Merge Request (Gitlab). Analyze changes in code.

CRITICAL: This is an automated review. You suggest what to fix/make better and user will fix issues in code.

";

pub const DEFAULT_PROMPT: &str = "
You are a reviewer of a Merge Request for GitLab. Analyze the provided code changes (diff) and offer specific suggestions for improvement.
Focus on identifying potential bugs, security vulnerabilities, and areas where the code deviates from best practices.
Your feedback should be clear, concise, and directly related to the code in the diff.
This is an automated review. You suggest what to fix/make better and user will fix issues in code.
";

/// Prompt for the structured reviewer. The line-counting rules here are what
/// the +1 correction in [`crate::review::threads`] compensates for.
pub const DEFAULT_THREADS_PROMPT: &str = r#"
You are Reviewer of Merge Request (Gitlab). Analyze changes in code.

CRITICAL: This is an automated review. You suggest what to fix/make better and user will fix issues in code.

Output format is json, markdown syntax is allowed only in comment and body fields.

## JSON template:
<code>
{
  "comment": "Brief summary of MR",
  "threads": [
    {
      "new_line": 123,
      "old_line": 123,
      "new_path": "app/file.py",
      "old_path": "app/file.py",
      "body": "problem description and suggestion to fix"
    }
  ]
}
</code>

## Rules:
- old_path file path before change, omit it if old_path doesn't exist or it is /dev/null
- new_path file path after change, omit it if new_path doesn't exist or it is /dev/null
- old_line the line number before change (optional), don't include it if line didn't exist.
- new_line the line number after change (optional), don't include it if line is deleted.
- Both old_path and new_path are required and must refer to the file path before and after the change.
- To create a thread on an added line, use new_line and don't include old_line.
- To create a thread on a removed line, use old_line and don't include new_line.
- To create a thread on an unchanged line, include both new_line and old_line for the line. These positions might not be the same if earlier changes in the file changed the line number.

LINE NUMBER ACCURACY IS CRITICAL:

**How to determine line numbers from diff:**

1. Find the hunk header: @@ -old_start,old_count +new_start,new_count @@
   Example: @@ -10,5 +12,6 @@ means old starts at line 10, new starts at line 12

2. Count from the start:
   - Lines starting with -: exist in OLD version only → use old_line
   - Lines starting with +: exist in NEW version only → use new_line
   - Lines starting with space: exist in BOTH → use both old_line and new_line

3. **NEVER guess or calculate line numbers**
   - Use ONLY what you can directly count from the diff
   - If you cannot determine a line number with 100% certainty, OMIT that field
   - It's better to have no line number than a wrong one

4. **When to omit fields:**
   - Omit old_line if the line is ADDED (starts with +)
   - Omit new_line if the line is DELETED (starts with -)
   - If you're unsure about any line number, create a general file comment without line numbers

**Invalid line numbers will cause the review to fail. Double-check every number.**

"#;

/// Concatenates `template` with the MR header lines and the fenced diff.
///
/// Deterministic; the diff is inserted as is (invalid UTF-8 sequences, if
/// any, are replaced since the wire formats are JSON strings).
pub fn assemble_prompt(template: &str, title: &str, author: &str, description: &str, diff: &[u8]) -> String {
    let diff = String::from_utf8_lossy(diff);

    let mut s = String::with_capacity(template.len() + diff.len() + title.len() + 64);
    s.push_str(template);
    s.push_str("\nTitle: ");
    s.push_str(title);
    s.push_str("\nAuthor: ");
    s.push_str(author);
    s.push('\n');
    if !description.is_empty() {
        s.push_str("Description: ");
        s.push_str(description);
        s.push('\n');
    }
    s.push_str("# Diff\n```");
    s.push_str(&diff);
    s.push_str("\n```\n");
    s
}

/// [`assemble_prompt`] over a whole request.
pub fn build_review_prompt(template: &str, req: &ReviewRequest) -> String {
    assemble_prompt(template, &req.title, &req.author, &req.description, &req.diffs)
}
