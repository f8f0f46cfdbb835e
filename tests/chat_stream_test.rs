//! End-to-end chat turns against a local HTTP server using wiremock.
//!
//! These tests drive a real `ReqwestHttpClient` through `ChatSession`, so
//! the whole path from socket bytes to transcript is exercised.

use ragchat::session::ERROR_PREFIX;
use ragchat::{ChatSession, RagClient, RetrievalScope, SessionState};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Join frames into an event-stream body.
fn sse_body(frames: &[&str]) -> String {
    frames
        .iter()
        .map(|frame| format!("data: {}\n\n", frame))
        .collect()
}

fn session_for(server: &MockServer) -> ChatSession {
    ChatSession::new(
        RagClient::new(server.uri()),
        RetrievalScope::new("docs", "cv.pdf", 6),
    )
}

async fn mount_stream(server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/rag/chat/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_answer_with_citation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag/chat/stream"))
        .and(header("accept", "text/event-stream"))
        .and(body_json(serde_json::json!({
            "message": "What is on page 2?",
            "collection": "docs",
            "doc_id": "cv.pdf",
            "top_k": 6
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&[
                    r#"{"type":"citations","citations":[{"i":1,"doc_id":"cv.pdf","page":2,"stable_id":null,"score":0.91}]}"#,
                    r#"{"type":"response.output_text.delta","delta":"The candidate "}"#,
                    r#"{"type":"response.output_text.delta","delta":"has 5 years experience."}"#,
                    "[DONE]",
                ])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let state = session.send("What is on page 2?").unwrap().wait().await;

    assert_eq!(state, SessionState::Completed);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[0].text, "What is on page 2?");
    assert_eq!(
        snapshot.answer(),
        Some("The candidate has 5 years experience.")
    );
    assert_eq!(snapshot.citations.len(), 1);
    let citation = &snapshot.citations[0];
    assert_eq!(citation.index, 1);
    assert_eq!(citation.document_id, "cv.pdf");
    assert_eq!(citation.page, 2);
    assert_eq!(citation.relevance_score, Some(0.91));
    assert_eq!(citation.stable_id, None);
}

#[tokio::test]
async fn test_non_2xx_fails_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rag/chat/stream"))
        .respond_with(ResponseTemplate::new(503).set_body_string("index not ready"))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let state = session.send("What is on page 2?").unwrap().wait().await;

    match state {
        SessionState::Failed(reason) => assert!(reason.contains("503"), "{}", reason),
        other => panic!("Expected Failed, got {:?}", other),
    }
    let answer = session.snapshot().answer().unwrap_or_default().to_string();
    assert!(answer.starts_with(ERROR_PREFIX), "{}", answer);
    assert!(!session.is_streaming());
}

#[tokio::test]
async fn test_invalid_json_frame_skipped() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        sse_body(&[
            r#"{"delta":"Before "}"#,
            "not valid json",
            r#"{"delta":"after."}"#,
            "[DONE]",
        ]),
    )
    .await;

    let session = session_for(&server);
    let state = session.send("q").unwrap().wait().await;

    assert_eq!(state, SessionState::Completed);
    assert_eq!(session.snapshot().answer(), Some("Before after."));
}

#[tokio::test]
async fn test_alternate_payload_shapes() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        sse_body(&[
            r#"{"type":"response.created"}"#,
            r#"{"type":"delta","text":"Via text. "}"#,
            r#"{"type":"response.output_text.delta","delta":"Via delta."}"#,
            r#"{"type":"response.output_text.done","text":"Via text. Via delta."}"#,
            r#"{"type":"error","message":"rate limited"}"#,
            "[DONE]",
        ]),
    )
    .await;

    let session = session_for(&server);
    session.send("q").unwrap().wait().await;

    assert_eq!(session.snapshot().answer(), Some("Via text. Via delta."));
}

#[tokio::test]
async fn test_stream_without_done_completes() {
    let server = MockServer::start().await;
    let mut body = sse_body(&[r#"{"delta":"Cut short"}"#]);
    body.push_str("data: {\"delta\":\" never terminated\"}");
    mount_stream(&server, body).await;

    let session = session_for(&server);
    let state = session.send("q").unwrap().wait().await;

    assert_eq!(state, SessionState::Completed);
    assert_eq!(session.snapshot().answer(), Some("Cut short"));
}

#[tokio::test]
async fn test_crlf_payload_lines() {
    let server = MockServer::start().await;
    mount_stream(
        &server,
        "data: {\"delta\":\"windows\"}\r\n\ndata: [DONE]\r\n\n".to_string(),
    )
    .await;

    let session = session_for(&server);
    let state = session.send("q").unwrap().wait().await;

    assert_eq!(state, SessionState::Completed);
    assert_eq!(session.snapshot().answer(), Some("windows"));
}

#[tokio::test]
async fn test_connection_refused_fails_turn() {
    let session = ChatSession::new(
        RagClient::new("http://127.0.0.1:1"),
        RetrievalScope::new("docs", "cv.pdf", 6),
    );
    let state = session.send("q").unwrap().wait().await;

    assert!(matches!(state, SessionState::Failed(_)));
    assert!(session
        .snapshot()
        .answer()
        .unwrap_or_default()
        .starts_with(ERROR_PREFIX));
}

#[tokio::test]
async fn test_turns_accumulate_in_order() {
    let server = MockServer::start().await;
    mount_stream(&server, sse_body(&[r#"{"delta":"ok"}"#, "[DONE]"])).await;

    let session = session_for(&server);
    session.send("first").unwrap().wait().await;
    session.send("second").unwrap().wait().await;

    let texts: Vec<String> = session.messages().into_iter().map(|m| m.text).collect();
    assert_eq!(texts, vec!["first", "ok", "second", "ok"]);
}
