//! End-to-end tests of the query service HTTP API with mocked providers.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use rag_search::server::{ERROR_KIND_HEADER, GENERIC_ERROR_MESSAGE, serve};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use common::{MockProvider, completion, organic, spawn_openai, spawn_serper};

/// Starts the service in front of the given mocks and returns its base URL.
async fn start_service(serper: &MockProvider, openai: &MockProvider) -> String {
    let answerer = Arc::new(common::answerer(serper, openai));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind service");
    let addr = listener.local_addr().expect("service has no address");

    tokio::spawn(async move {
        serve(listener, answerer, std::future::pending())
            .await
            .expect("service failed");
    });

    format!("http://{addr}")
}

async fn post_search(base: &str, body: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/search"))
        .header("Content-Type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("request failed")
}

#[tokio::test]
async fn health_reports_running() {
    let serper = spawn_serper(StatusCode::OK, organic(&[])).await;
    let openai = spawn_openai(StatusCode::OK, completion("")).await;
    let base = start_service(&serper, &openai).await;

    let response = reqwest::get(format!("{base}/api/health")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "running" }));
}

#[tokio::test]
async fn capital_of_france_returns_answer_and_ordered_sources() {
    let serper = spawn_serper(
        StatusCode::OK,
        organic(&["https://a.example", "https://b.example"]),
    )
    .await;
    let openai = spawn_openai(
        StatusCode::OK,
        completion("  The capital of France is Paris.\n"),
    )
    .await;
    let base = start_service(&serper, &openai).await;

    let response = post_search(&base, r#"{"query": "capital of France"}"#).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "response": "The capital of France is Paris.",
            "sources": ["https://a.example", "https://b.example"]
        })
    );

    assert_eq!(
        serper.requests()[0].body,
        json!({ "q": "capital of France" })
    );

    let llm_requests = openai.requests();
    assert_eq!(llm_requests.len(), 1);
    let messages = &llm_requests[0].body["messages"];
    assert_eq!(messages[0]["content"], "You are a helpful assistant.");
    let prompt = messages[1]["content"].as_str().unwrap();
    assert!(prompt.contains(
        "Context: Content from https://a.example\nContent from https://b.example\n\n"
    ));
    assert!(prompt.ends_with("Question: capital of France\nAnswer:"));
}

#[tokio::test]
async fn search_provider_failure_is_generic_500() {
    let serper = spawn_serper(StatusCode::INTERNAL_SERVER_ERROR, "{}").await;
    let openai = spawn_openai(StatusCode::OK, completion("unused")).await;
    let base = start_service(&serper, &openai).await;

    let response = post_search(&base, r#"{"query": "capital of France"}"#).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        response.headers()[ERROR_KIND_HEADER],
        "provider"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }));
    assert!(openai.requests().is_empty());
}

#[tokio::test]
async fn completion_parse_failure_is_generic_500() {
    let serper = spawn_serper(StatusCode::OK, organic(&["https://a.example"])).await;
    let openai = spawn_openai(StatusCode::OK, r#"{"unexpected": true}"#).await;
    let base = start_service(&serper, &openai).await;

    let response = post_search(&base, r#"{"query": "q"}"#).await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.headers()[ERROR_KIND_HEADER], "parse");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn malformed_body_is_generic_500_without_provider_calls() {
    let serper = spawn_serper(StatusCode::OK, organic(&[])).await;
    let openai = spawn_openai(StatusCode::OK, completion("unused")).await;
    let base = start_service(&serper, &openai).await;

    let response = post_search(&base, "{not json").await;

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(response.headers()[ERROR_KIND_HEADER], "parse");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": GENERIC_ERROR_MESSAGE }));
    assert!(serper.requests().is_empty());
    assert!(openai.requests().is_empty());
}

#[tokio::test]
async fn missing_query_is_searched_as_empty_string() {
    let serper = spawn_serper(StatusCode::OK, organic(&[])).await;
    let openai = spawn_openai(StatusCode::OK, completion("I need a question.")).await;
    let base = start_service(&serper, &openai).await;

    let response = post_search(&base, "{}").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "response": "I need a question.", "sources": [] })
    );
    assert_eq!(serper.requests()[0].body, json!({ "q": "" }));

    let prompt = openai.requests()[0].body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(prompt.contains("Context: \n\nQuestion: \nAnswer:"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let serper = spawn_serper(StatusCode::OK, organic(&[])).await;
    let openai = spawn_openai(StatusCode::OK, completion("")).await;
    let base = start_service(&serper, &openai).await;

    let response = reqwest::get(format!("{base}/api/unknown")).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);
}
