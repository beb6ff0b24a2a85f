//! `handle_error` end to end: failures reaching the configured sink.

mod common;

use std::sync::Arc;

use common::{api, hub_error, hub_error_with, TestHub};
use hmclient::notify::{INVALID_REQUEST_MESSAGE, NETWORK_ERROR_MESSAGE};
use hmclient::{
    ChannelSink, ClientError, ClientOptions, FailureKind, HubClient, MemoryStorage, Notification,
    Session, Severity, TransportFailure,
};
use hmproto::request::{GetRoomsRequest, SendActionRequest};
use hmproto::HubError;
use serde_json::json;

#[tokio::test]
async fn custom_plugin_error_text_reaches_sink() {
    let hub = TestHub::start().await;
    hub.session.set_token("t");
    api()
        .respond_with(hub_error_with(
            500,
            json!({"code": 500, "message": "CUSTOM_PLUGIN_ERROR", "text": "Device offline"}),
        ))
        .mount(&hub.server)
        .await;

    let err = hub
        .client
        .call(SendActionRequest::default())
        .await
        .unwrap_err();
    hub.client.handle_error(&err);

    assert_eq!(hub.sink.drain(), vec![Notification::error("Device offline")]);
}

#[tokio::test]
async fn handle_error_without_code_field() {
    let hub = TestHub::start().await;
    let error: HubError =
        serde_json::from_value(json!({"message": "CUSTOM_PLUGIN_ERROR", "text": "Device offline"}))
            .unwrap();

    hub.client.handle_error(&ClientError::Hub(error));

    let notes = hub.sink.drain();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "Device offline");
}

#[tokio::test]
async fn token_invalid_is_not_notified() {
    let hub = TestHub::start().await;
    api()
        .respond_with(hub_error(401, "TOKEN_INVALID"))
        .mount(&hub.server)
        .await;

    let err = hub.client.call(GetRoomsRequest {}).await.unwrap_err();
    hub.client.handle_error(&err);
    hub.client.handle_error(&err);

    assert!(hub.sink.is_empty());
}

#[tokio::test]
async fn one_notification_per_call() {
    let hub = TestHub::start().await;
    api()
        .respond_with(hub_error_with(
            400,
            json!({"code": 400, "message": "MISSING_PARAMETER", "paramName": "id"}),
        ))
        .mount(&hub.server)
        .await;

    let err = hub.client.call(GetRoomsRequest {}).await.unwrap_err();
    hub.client.handle_error(&err);
    hub.client.handle_error(&err);

    let notes = hub.sink.drain();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|n| n.message == INVALID_REQUEST_MESSAGE));
}

#[tokio::test]
async fn channel_sink_receives_network_errors() {
    let (sink, mut rx) = ChannelSink::new();
    let session = Arc::new(Session::new(Arc::new(MemoryStorage::new()), "token"));
    let client = HubClient::new(ClientOptions::default(), session, Arc::new(sink));

    client.handle_error(&ClientError::Network {
        data: TransportFailure {
            kind: FailureKind::Connect,
            message: "connection refused".into(),
        },
    });

    let note = rx.recv().await.unwrap();
    assert_eq!(note.severity, Severity::Error);
    assert_eq!(note.message, NETWORK_ERROR_MESSAGE);
}
