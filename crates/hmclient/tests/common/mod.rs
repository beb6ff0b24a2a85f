//! Shared setup for dispatch tests against a mocked hub.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use hmclient::{
    ClientOptions, HubClient, MemoryStorage, QueueSink, RetryPolicy, Session, DEFAULT_STORAGE_KEY,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// A mocked hub plus a client wired to it, with every collaborator exposed
/// for inspection.
pub struct TestHub {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub session: Arc<Session>,
    pub sink: Arc<QueueSink>,
    pub client: HubClient,
}

impl TestHub {
    pub async fn start() -> Self {
        Self::start_with(|options| options).await
    }

    /// Start with customized options. Retries default to a short delay so
    /// tests stay fast.
    pub async fn start_with<F>(customize: F) -> Self
    where
        F: FnOnce(ClientOptions) -> ClientOptions,
    {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(Session::new(storage.clone(), DEFAULT_STORAGE_KEY));
        let sink = Arc::new(QueueSink::new());

        let options = ClientOptions::with_base_url(server.uri())
            .retry(RetryPolicy::default().with_delay(Duration::from_millis(50)));
        let client = HubClient::new(customize(options), session.clone(), sink.clone());

        Self {
            server,
            storage,
            session,
            sink,
            client,
        }
    }

    /// Token as persisted in durable storage.
    pub fn stored_token(&self) -> Option<String> {
        use hmclient::TokenStorage;
        self.storage
            .get(DEFAULT_STORAGE_KEY)
            .expect("memory storage never fails")
    }

    /// Bodies of every request the hub received, parsed as JSON.
    pub async fn received_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).expect("request body is JSON"))
            .collect()
    }
}

/// `POST /api`
pub fn api() -> MockBuilder {
    Mock::given(method("POST")).and(path("/api"))
}

pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"type": "ok", "data": data}))
}

/// An error envelope answered with the matching HTTP status.
pub fn hub_error(code: u16, message: &str) -> ResponseTemplate {
    hub_error_with(code, json!({"code": code, "message": message}))
}

pub fn hub_error_with(code: u16, error: Value) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(json!({"type": "error", "error": error}))
}
