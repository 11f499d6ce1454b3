//! Wire-level tests for every provider against a local mock server.

use ai_llm_service::{
    AiLlmError, LlmModelConfig, LlmProvider, LlmService, MissingField, ResponseShapeError,
    TransportError,
};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn cfg(provider: LlmProvider, endpoint: String, model: &str) -> LlmModelConfig {
    LlmModelConfig {
        provider,
        model: model.to_string(),
        endpoint,
        api_key: "test-key".to_string(),
        max_tokens: match provider {
            LlmProvider::Anthropic | LlmProvider::DeepSeek => Some(512),
            _ => None,
        },
        api_version: match provider {
            LlmProvider::Anthropic => Some("2023-06-01".to_string()),
            _ => None,
        },
        timeout_secs: 5,
    }
}

async fn submit(cfg: LlmModelConfig) -> Result<String, AiLlmError> {
    LlmService::new(cfg)?
        .submit("PROMPT", &CancellationToken::new())
        .await
}

fn assert_missing(err: AiLlmError, expected: MissingField) {
    match err {
        AiLlmError::ResponseShape(ResponseShapeError::Missing { field, .. }) => {
            assert_eq!(field, expected)
        }
        other => panic!("expected missing {expected}, got {other:?}"),
    }
}

fn assert_status(err: AiLlmError, expected_status: u16, expected_body: &str) {
    match err {
        AiLlmError::Transport(TransportError::HttpStatus { status, body, .. }) => {
            assert_eq!(status, expected_status);
            assert_eq!(body, expected_body);
        }
        other => panic!("expected http status error, got {other:?}"),
    }
}

/* ------------------------------------------------------------------------- */
/* A: responses                                                              */
/* ------------------------------------------------------------------------- */

#[tokio::test]
async fn openai_returns_first_message_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/responses")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"model": "gpt-x", "input": "PROMPT"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"id":"resp_1","status":"completed","output":[
                {"type":"reasoning","id":"rs_1","summary":[]},
                {"type":"message","id":"msg_1","role":"assistant",
                 "content":[{"type":"output_text","text":"Rename `x`.","annotations":[]}]}
            ],"usage":{"total_tokens":42}}"#,
        )
        .expect(1)
        .create_async()
        .await;

    let text = submit(cfg(
        LlmProvider::OpenAi,
        format!("{}/v1/responses", server.url()),
        "gpt-x",
    ))
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Rename `x`.");
}

#[tokio::test]
async fn openai_without_message_reports_no_results() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body(r#"{"output":[]}"#)
        .create_async()
        .await;

    let err = submit(cfg(
        LlmProvider::OpenAi,
        format!("{}/v1/responses", server.url()),
        "gpt-x",
    ))
    .await
    .unwrap_err();

    assert_missing(err, MissingField::Results);
}

/* ------------------------------------------------------------------------- */
/* B: messages                                                               */
/* ------------------------------------------------------------------------- */

#[tokio::test]
async fn anthropic_sends_key_and_version_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({
            "model": "claude-x",
            "max_tokens": 512,
            "messages": [{"role": "user", "content": [{"type": "text", "text": "PROMPT"}]}]
        })))
        .with_status(200)
        .with_body(
            r#"{"id":"msg_1","type":"message","role":"assistant","model":"claude-x",
                "content":[{"type":"text","text":"Looks good."}],
                "stop_reason":"end_turn","usage":{"input_tokens":3,"output_tokens":2}}"#,
        )
        .create_async()
        .await;

    let text = submit(cfg(
        LlmProvider::Anthropic,
        format!("{}/v1/messages", server.url()),
        "claude-x",
    ))
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Looks good.");
}

#[tokio::test]
async fn anthropic_empty_content() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(r#"{"content":[]}"#)
        .create_async()
        .await;

    let err = submit(cfg(
        LlmProvider::Anthropic,
        format!("{}/v1/messages", server.url()),
        "claude-x",
    ))
    .await
    .unwrap_err();

    assert_missing(err, MissingField::Content);
}

/* ------------------------------------------------------------------------- */
/* C: chat completions                                                       */
/* ------------------------------------------------------------------------- */

#[tokio::test]
async fn deepseek_returns_first_choice() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(json!({
            "model": "deepseek-chat",
            "max_tokens": 512,
            "messages": [{"role": "user", "content": "PROMPT"}]
        })))
        .with_status(200)
        .with_body(
            r#"{"id":"c","object":"chat.completion","created":1,
                "choices":[{"index":0,"message":{"role":"assistant","content":"Add a test."},"finish_reason":"stop"}]}"#,
        )
        .create_async()
        .await;

    let text = submit(cfg(
        LlmProvider::DeepSeek,
        format!("{}/chat/completions", server.url()),
        "deepseek-chat",
    ))
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Add a test.");
}

#[tokio::test]
async fn deepseek_empty_choices() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let err = submit(cfg(
        LlmProvider::DeepSeek,
        format!("{}/chat/completions", server.url()),
        "deepseek-chat",
    ))
    .await
    .unwrap_err();

    assert_missing(err, MissingField::Choices);
}

/* ------------------------------------------------------------------------- */
/* D: generate content                                                       */
/* ------------------------------------------------------------------------- */

#[tokio::test]
async fn gemini_puts_key_in_query_and_model_in_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-pro:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::Json(json!({"contents": [{"parts": [{"text": "PROMPT"}]}]})))
        .with_status(200)
        .with_body(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Nit: typo."}]},
                "finishReason":"STOP","index":0}]}"#,
        )
        .create_async()
        .await;

    let text = submit(cfg(
        LlmProvider::Gemini,
        format!("{}/v1beta/models/", server.url()),
        "gemini-pro",
    ))
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Nit: typo.");
}

#[tokio::test]
async fn gemini_empty_candidates_and_parts() {
    let mut server = Server::new_async().await;
    let endpoint = format!("{}/v1beta/models/", server.url());

    server
        .mock("POST", "/v1beta/models/no-candidates:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[]}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/v1beta/models/no-parts:generateContent")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[]}}]}"#)
        .create_async()
        .await;

    let err = submit(cfg(LlmProvider::Gemini, endpoint.clone(), "no-candidates"))
        .await
        .unwrap_err();
    assert_missing(err, MissingField::Candidates);

    let err = submit(cfg(LlmProvider::Gemini, endpoint, "no-parts"))
        .await
        .unwrap_err();
    assert_missing(err, MissingField::Parts);
}

/* ------------------------------------------------------------------------- */
/* Shared behaviour                                                          */
/* ------------------------------------------------------------------------- */

#[tokio::test]
async fn non_success_status_carries_code_and_raw_body_for_every_provider() {
    let mut server = Server::new_async().await;
    let cases = [
        (LlmProvider::OpenAi, "/responses", 401, r#"{"error":"bad key"}"#),
        (LlmProvider::Anthropic, "/messages", 529, "overloaded <html>"),
        (LlmProvider::DeepSeek, "/chat", 500, ""),
        (LlmProvider::Gemini, "/models/m:generateContent", 404, "not json at all"),
    ];

    for (provider, path, status, body) in cases {
        server
            .mock("POST", path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await;

        let endpoint = match provider {
            LlmProvider::Gemini => format!("{}/models/", server.url()),
            _ => format!("{}{}", server.url(), path),
        };
        let err = submit(cfg(provider, endpoint, "m")).await.unwrap_err();
        assert_status(err, status as u16, body);
    }
}

#[tokio::test]
async fn any_2xx_status_is_success() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(203)
        .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
        .create_async()
        .await;

    let text = submit(cfg(
        LlmProvider::DeepSeek,
        format!("{}/chat/completions", server.url()),
        "deepseek-chat",
    ))
    .await
    .unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let err = submit(cfg(
        LlmProvider::Anthropic,
        format!("{}/v1/messages", server.url()),
        "claude-x",
    ))
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        AiLlmError::ResponseShape(ResponseShapeError::Decode { .. })
    ));
}

#[tokio::test]
async fn gemini_status_error_does_not_leak_key() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/models/m:generateContent")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body("denied")
        .create_async()
        .await;

    let err = submit(cfg(
        LlmProvider::Gemini,
        format!("{}/models/", server.url()),
        "m",
    ))
    .await
    .unwrap_err();

    match &err {
        AiLlmError::Transport(TransportError::HttpStatus { url, .. }) => {
            assert!(!url.contains("test-key"))
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn cancelled_token_prevents_the_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/responses")
        .expect(0)
        .create_async()
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let service = LlmService::new(cfg(
        LlmProvider::OpenAi,
        format!("{}/v1/responses", server.url()),
        "gpt-x",
    ))
    .unwrap();
    let err = service.submit("PROMPT", &cancel).await.unwrap_err();

    assert!(matches!(err, AiLlmError::Cancelled));
    mock.assert_async().await;
}

/* ------------------------------------------------------------------------- */
/* Transport failures                                                        */
/* ------------------------------------------------------------------------- */

/// Accepts connections and never answers.
async fn silent_endpoint(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });
    format!("http://{addr}{path}")
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = submit(cfg(
        LlmProvider::DeepSeek,
        format!("http://{closed}/chat/completions"),
        "deepseek-chat",
    ))
    .await
    .unwrap_err();

    match err {
        AiLlmError::Transport(TransportError::Network { provider, .. }) => {
            assert_eq!(provider, LlmProvider::DeepSeek)
        }
        other => panic!("expected network error, got {other:?}"),
    }
}

#[tokio::test]
async fn stalled_provider_hits_configured_timeout() {
    let mut c = cfg(
        LlmProvider::OpenAi,
        silent_endpoint("/v1/responses").await,
        "gpt-x",
    );
    c.timeout_secs = 1;

    let started = std::time::Instant::now();
    let err = submit(c).await.unwrap_err();

    match err {
        AiLlmError::Transport(TransportError::Timeout { provider, after }) => {
            assert_eq!(provider, LlmProvider::OpenAi);
            assert_eq!(after, std::time::Duration::from_secs(1));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
