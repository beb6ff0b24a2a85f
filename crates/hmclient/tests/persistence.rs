//! Session tokens surviving a client restart through file storage.

mod common;

use std::sync::Arc;

use common::{api, ok};
use hmclient::{
    ClientOptions, FileStorage, HubClient, QueueSink, Session, TokenStorage, DEFAULT_STORAGE_KEY,
};
use hmproto::request::GetRoomsRequest;
use serde_json::json;
use wiremock::matchers::query_param;
use wiremock::MockServer;

fn client_for(server: &MockServer, storage: Arc<FileStorage>) -> HubClient {
    let session = Arc::new(Session::restore(storage, DEFAULT_STORAGE_KEY));
    HubClient::new(
        ClientOptions::with_base_url(server.uri()),
        session,
        Arc::new(QueueSink::new()),
    )
}

#[tokio::test]
async fn token_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("state/session.json");
    let server = MockServer::start().await;

    api()
        .and(query_param("token", ""))
        .respond_with(ok(json!({"token": "persisted"})))
        .expect(1)
        .mount(&server)
        .await;
    api()
        .and(query_param("token", "persisted"))
        .respond_with(ok(json!({"rooms": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let first = client_for(&server, Arc::new(FileStorage::new(&store_path)));
    first.login("admin", "correct", "test").await.unwrap();
    drop(first);

    let second = client_for(&server, Arc::new(FileStorage::new(&store_path)));
    assert!(second.session().is_authenticated());
    second.call(GetRoomsRequest {}).await.unwrap();
}

#[tokio::test]
async fn token_invalid_removes_persisted_token() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(FileStorage::new(dir.path().join("session.json")));
    storage.set(DEFAULT_STORAGE_KEY, "stale").unwrap();

    let server = MockServer::start().await;
    api()
        .respond_with(common::hub_error(401, "TOKEN_INVALID"))
        .mount(&server)
        .await;

    let client = client_for(&server, storage.clone());
    assert!(client.session().is_authenticated());
    client.call(GetRoomsRequest {}).await.unwrap_err();

    assert_eq!(storage.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    assert!(!client.session().is_authenticated());
}
