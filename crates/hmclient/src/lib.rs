//! hmclient - dispatch and session layer for the Home Modules hub.
//!
//! [`HubClient`] performs one protocol round trip per call and applies the
//! protocol's side effects: it forgets the session on `TOKEN_INVALID` and
//! resends rate-limited requests according to its [`RetryPolicy`]. Session
//! state lives in an explicit [`Session`] injected at construction, and
//! user-facing messages go to a [`NotificationSink`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hmclient::{ClientOptions, FileStorage, HubClient, QueueSink, Session};
//! use hmproto::request::GetRoomsRequest;
//!
//! # async fn run() -> Result<(), hmclient::ClientError> {
//! let storage = Arc::new(FileStorage::new("/tmp/hm/session.json"));
//! let session = Arc::new(Session::restore(storage, "token"));
//! let sink = Arc::new(QueueSink::new());
//! let client = HubClient::new(ClientOptions::with_base_url("http://hub.local:8080"), session, sink);
//!
//! client.login("admin", "secret", "laptop").await?;
//! match client.call(GetRoomsRequest {}).await {
//!     Ok(rooms) => println!("{} rooms", rooms.rooms.len()),
//!     Err(e) => client.handle_error(&e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod notify;
pub mod retry;
pub mod session;
pub mod storage;

pub use client::{ClientOptions, HubClient};
pub use error::{ClientError, FailureKind, TransportFailure, NETWORK_ERROR};
pub use notify::{
    notification_for, ChannelSink, Notification, NotificationSink, QueueSink, Severity,
    TracingSink,
};
pub use retry::RetryPolicy;
pub use session::{Session, SessionState, DEFAULT_STORAGE_KEY};
pub use storage::{FileStorage, MemoryStorage, StorageError, TokenStorage};
