/// Represents the provider (backend) a review is sent to.
///
/// Each variant owns one wire protocol: how the key is attached, the request
/// envelope, and where the generated text lives in the response.
///
/// | Variant     | Auth                              | Text location                          |
/// |-------------|-----------------------------------|----------------------------------------|
/// | `OpenAi`    | `Authorization: Bearer`           | `output[type=message].content[0].text` |
/// | `Anthropic` | `x-api-key` + `anthropic-version` | `content[0].text`                      |
/// | `DeepSeek`  | `Authorization: Bearer`           | `choices[0].message.content`           |
/// | `Gemini`    | `?key=` query parameter           | `candidates[0].content.parts[0].text`  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Responses-style endpoint (`/v1/responses`).
    OpenAi,
    /// Chat-message-style endpoint (`/v1/messages`).
    Anthropic,
    /// Chat-completions-style endpoint (`/chat/completions`).
    DeepSeek,
    /// Generate-content-style endpoint (`models/<model>:generateContent`).
    Gemini,
}

impl LlmProvider {
    /// Short lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
            LlmProvider::DeepSeek => "deepseek",
            LlmProvider::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
