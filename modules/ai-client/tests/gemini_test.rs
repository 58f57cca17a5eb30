//! `Gemini` against a local HTTP listener that serves one canned reply.

use ai_client::{AiError, Gemini, StructuredGenerator};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

const MODEL: &str = "gemini-test";

/// Serve a single response and hand back the raw request it received.
async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/v1beta"), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn gemini(base_url: &str) -> Gemini {
    Gemini::new("test-key-123", MODEL).with_base_url(base_url)
}

fn schema() -> serde_json::Value {
    json!({"type": "OBJECT", "properties": {"reason": {"type": "STRING"}}})
}

#[tokio::test]
async fn success_sends_key_path_and_schema() {
    let envelope = json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "{\"reason\":\"ok\"}"}]},
            "finishReason": "STOP"
        }]
    })
    .to_string();
    let (url, server) = serve_once("200 OK", &envelope).await;

    let text = gemini(&url)
        .generate_structured("Analyze this", &schema())
        .await
        .unwrap();
    assert_eq!(text, "{\"reason\":\"ok\"}");

    let request = server.await.unwrap();
    let lower = request.to_ascii_lowercase();
    assert!(request.starts_with(&format!("POST /v1beta/models/{MODEL}:generateContent ")));
    assert!(lower.contains("x-goog-api-key: test-key-123"));
    assert!(request.contains("\"responseMimeType\":\"application/json\""));
    assert!(request.contains("\"responseSchema\""));
    assert!(request.contains("Analyze this"));
}

#[tokio::test]
async fn rate_limited_is_api_error_with_body() {
    let (url, _server) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#,
    )
    .await;

    let err = gemini(&url).complete("hi").await.unwrap_err();
    match err {
        AiError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("RESOURCE_EXHAUSTED"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn blocked_prompt_is_blocked_error() {
    let (url, _server) =
        serve_once("200 OK", r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;

    let err = gemini(&url)
        .generate_structured("hi", &schema())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Blocked(ref reason) if reason == "SAFETY"));
}

#[tokio::test]
async fn candidate_without_text_is_empty_response() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{}]},"finishReason":"MAX_TOKENS"}]}"#,
    )
    .await;

    let err = gemini(&url)
        .generate_structured("hi", &schema())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::EmptyResponse));
}

#[tokio::test]
async fn non_json_envelope_is_parse_error() {
    let (url, _server) = serve_once("200 OK", "<html>gateway</html>").await;

    let err = gemini(&url)
        .generate_structured("hi", &schema())
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Parse(_)), "got {err:?}");
}
