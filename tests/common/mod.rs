//! In-process mock providers for integration tests.
//!
//! Each mock is a tiny axum server on an ephemeral port that records every
//! request it receives and answers with a canned status and body.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use rag_search::SearchAnswerer;
use rag_search::llm::OpenAiClientBuilder;
use rag_search::search::SerperClientBuilder;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const SERPER_PATH: &str = "/search";
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";
pub const SERPER_KEY: &str = "serper-test-key";
pub const OPENAI_KEY: &str = "openai-test-key";

/// One request seen by a mock provider.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct MockProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockProvider {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a mock answering `POST path` with `status` and `body`.
pub async fn spawn_mock(path: &str, status: StatusCode, body: impl Into<String>) -> MockProvider {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let body = body.into();

    let app = Router::new().route(
        path,
        post(move |headers: HeaderMap, payload: Bytes| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                let json = serde_json::from_slice(&payload).unwrap_or(Value::Null);
                recorded.lock().unwrap().push(Recorded { headers, body: json });
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock provider");
    let addr = listener.local_addr().expect("mock provider has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock provider failed");
    });

    MockProvider { addr, requests }
}

pub async fn spawn_serper(status: StatusCode, body: impl Into<String>) -> MockProvider {
    spawn_mock(SERPER_PATH, status, body).await
}

pub async fn spawn_openai(status: StatusCode, body: impl Into<String>) -> MockProvider {
    spawn_mock(COMPLETIONS_PATH, status, body).await
}

/// Serper response body with one organic result per link.
pub fn organic(links: &[&str]) -> String {
    let results: Vec<Value> = links.iter().map(|link| json!({ "link": link })).collect();
    json!({ "organic": results }).to_string()
}

/// Chat-completion response body whose first choice says `text`.
pub fn completion(text: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": text } }
        ]
    })
    .to_string()
}

pub fn serper_url(mock: &MockProvider) -> String {
    format!("http://{}{}", mock.addr, SERPER_PATH)
}

pub fn openai_base_url(mock: &MockProvider) -> String {
    format!("http://{}/v1", mock.addr)
}

/// Real provider clients pointed at the mocks.
pub fn answerer(serper: &MockProvider, openai: &MockProvider) -> SearchAnswerer {
    let search = SerperClientBuilder::new()
        .base_url(serper_url(serper))
        .api_key(SERPER_KEY)
        .build()
        .expect("failed to build search client");
    let llm = OpenAiClientBuilder::new()
        .base_url(openai_base_url(openai))
        .api_key(OPENAI_KEY)
        .model("gpt-4.1")
        .max_tokens(300)
        .build()
        .expect("failed to build completion client");

    SearchAnswerer::new(Arc::new(search), Arc::new(llm))
}
