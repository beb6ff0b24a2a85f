//! User-facing notifications for failed requests.
//!
//! The dispatch layer never decides how a notification is shown. It hands a
//! [`Notification`] to whatever [`NotificationSink`] the client was built with.

use crate::error::ClientError;
use hmproto::{ErrorCode, ErrorKind};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub const INTERNAL_ERROR_MESSAGE: &str =
    "The hub ran into an internal error. Please try again later.";
pub const INVALID_REQUEST_MESSAGE: &str =
    "The app sent an invalid request to the hub. Please report this as a bug.";
pub const SESSION_TOO_NEW_MESSAGE: &str =
    "This action is only allowed from a session that is at least 24 hours old.";
pub const NETWORK_ERROR_MESSAGE: &str = "The hub could not be reached.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

/// The notification for an error, or `None` when nothing should be shown.
///
/// `TOKEN_INVALID` is silent because the client already logged out.
pub fn notification_for(error: &ClientError) -> Option<Notification> {
    let hub = match error {
        ClientError::Network { .. } => return Some(Notification::error(NETWORK_ERROR_MESSAGE)),
        ClientError::Protocol(_) => return Some(Notification::error(UNKNOWN_ERROR_MESSAGE)),
        ClientError::Hub(hub) => hub,
    };

    if let ErrorKind::CustomPluginError { text } = &hub.kind {
        return Some(Notification::error(text.clone()));
    }

    let notification = match hub.error_code() {
        Some(ErrorCode::TokenInvalid) => return None,
        Some(ErrorCode::InternalServerError) => Notification::error(INTERNAL_ERROR_MESSAGE),
        Some(
            ErrorCode::InvalidParameter
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidRequestJson
            | ErrorCode::InvalidRequestType
            | ErrorCode::MissingParameter
            | ErrorCode::ParameterOutOfRange,
        ) => Notification::error(INVALID_REQUEST_MESSAGE),
        Some(ErrorCode::SessionTooNew) => Notification::warning(SESSION_TOO_NEW_MESSAGE),
        _ => Notification::error(UNKNOWN_ERROR_MESSAGE),
    };
    Some(notification)
}

/// Receives notifications. Must not block for long.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        self(notification)
    }
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => tracing::error!(message = %notification.message, "notification"),
            Severity::Warning => tracing::warn!(message = %notification.message, "notification"),
            Severity::Info => tracing::info!(message = %notification.message, "notification"),
        }
    }
}

/// Collects notifications in order, for callers that render them later.
#[derive(Debug, Default)]
pub struct QueueSink {
    queue: Mutex<Vec<Notification>>,
}

impl QueueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notification.
    pub fn drain(&self) -> Vec<Notification> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        match self.queue.lock() {
            Ok(queue) => queue.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for QueueSink {
    fn notify(&self, notification: Notification) {
        match self.queue.lock() {
            Ok(mut queue) => queue.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

/// Forwards notifications to an async consumer.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, TransportFailure};
    use hmproto::{HubError, ObjectKind, ParameterPath};

    fn hub(kind: ErrorKind) -> ClientError {
        ClientError::Hub(HubError::new(kind))
    }

    fn message_for(error: ClientError) -> Option<String> {
        notification_for(&error).map(|n| n.message)
    }

    #[test]
    fn token_invalid_is_silent() {
        assert_eq!(notification_for(&hub(ErrorKind::TokenInvalid)), None);
    }

    #[test]
    fn custom_plugin_error_text_is_verbatim() {
        let err = ClientError::Hub(HubError::custom_plugin_error("Device offline"));
        assert_eq!(
            notification_for(&err),
            Some(Notification::error("Device offline"))
        );
    }

    #[test]
    fn request_bugs_share_a_message() {
        let path: ParameterPath = "room.name".parse().unwrap();
        for kind in [
            ErrorKind::InvalidRequest,
            ErrorKind::InvalidRequestJson,
            ErrorKind::InvalidRequestType,
            ErrorKind::MissingParameter { param_name: path.clone() },
            ErrorKind::InvalidParameter { param_name: path.clone() },
            ErrorKind::ParameterOutOfRange { param_name: path.clone() },
        ] {
            assert_eq!(message_for(hub(kind)).as_deref(), Some(INVALID_REQUEST_MESSAGE));
        }
    }

    #[test]
    fn remaining_mapping() {
        assert_eq!(
            message_for(hub(ErrorKind::InternalServerError)).as_deref(),
            Some(INTERNAL_ERROR_MESSAGE)
        );
        assert_eq!(
            notification_for(&hub(ErrorKind::SessionTooNew)),
            Some(Notification::warning(SESSION_TOO_NEW_MESSAGE))
        );
        let network = ClientError::Network {
            data: TransportFailure {
                kind: FailureKind::Timeout,
                message: "timed out".into(),
            },
        };
        assert_eq!(message_for(network).as_deref(), Some(NETWORK_ERROR_MESSAGE));

        for unknown in [
            hub(ErrorKind::Unrecognized {
                message: "TEAPOT".into(),
            }),
            hub(ErrorKind::NotFound { object: ObjectKind::Room }),
            hub(ErrorKind::TooManyRequests),
            ClientError::Protocol("garbage".into()),
        ] {
            assert_eq!(message_for(unknown).as_deref(), Some(UNKNOWN_ERROR_MESSAGE));
        }
    }

    #[test]
    fn queue_sink_drains_in_order() {
        let sink = QueueSink::new();
        sink.notify(Notification::info("one"));
        sink.notify(Notification::error("two"));
        assert_eq!(sink.len(), 2);
        let drained: Vec<_> = sink.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(drained, vec!["one", "two"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn closures_are_sinks() {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let seen_in_sink = seen.clone();
        let sink = move |n: Notification| seen_in_sink.lock().unwrap().push(n.severity);
        sink.notify(Notification::warning("careful"));
        assert_eq!(*seen.lock().unwrap(), vec![Severity::Warning]);
    }

    #[tokio::test]
    async fn channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.notify(Notification::info("hello"));
        assert_eq!(rx.recv().await, Some(Notification::info("hello")));
    }
}
