//! Hub dispatch client.
//!
//! Every call is a single `POST {base}/api` carrying the JSON request. The
//! session token travels next to the body, never inside it. Two answers have
//! side effects before they reach the caller:
//! - `TOKEN_INVALID` clears the session
//! - `TOO_MANY_REQUESTS` resends the same request after the policy's delay

use std::sync::Arc;
use std::time::Duration;

use hmconf::{HmConfig, TokenPlacement};
use hmproto::request::{ChangeUsernameRequest, LoginRequest, LogoutRequest};
use hmproto::responses::TokenResponse;
use hmproto::{decode_data, error_set_for, Envelope, ErrorCode, HubCall, HubRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use crate::error::ClientError;
use crate::notify::{notification_for, NotificationSink};
use crate::retry::RetryPolicy;
use crate::session::Session;

/// Options for configuring the hub client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Hub base URL; requests go to `{base_url}/api`
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout: Duration,
    pub token_placement: TokenPlacement,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(20),
            token_placement: TokenPlacement::Query,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_config(config: &HmConfig) -> Self {
        Self {
            base_url: config.hub.url.clone(),
            timeout: Duration::from_secs(config.hub.timeout_secs),
            token_placement: config.hub.token_placement,
            retry: RetryPolicy::from_config(&config.retry),
        }
    }

    pub fn token_placement(mut self, placement: TokenPlacement) -> Self {
        self.token_placement = placement;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the hub API.
///
/// Cheap to share behind an `Arc`; concurrent calls are independent.
pub struct HubClient {
    http: Client,
    endpoint: String,
    options: ClientOptions,
    session: Arc<Session>,
    sink: Arc<dyn NotificationSink>,
}

impl HubClient {
    pub fn new(
        options: ClientOptions,
        session: Arc<Session>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let endpoint = format!("{}/api", options.base_url.trim_end_matches('/'));
        Self {
            http: Client::new(),
            endpoint,
            options,
            session,
            sink,
        }
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Send a request and return the raw success payload.
    ///
    /// Error envelopes come back as [`ClientError::Hub`], unchanged.
    #[tracing::instrument(skip(self, request), fields(kind = %request.kind()))]
    pub async fn send_request(&self, request: &HubRequest) -> Result<Value, ClientError> {
        let kind = request.kind();
        let body = serde_json::to_string(request)
            .map_err(|e| ClientError::Protocol(format!("Failed to serialize request: {}", e)))?;

        let mut retries = 0u32;
        loop {
            let token = self.session.token();
            let error = match self.round_trip(&body, token.as_deref()).await? {
                Envelope::Ok { data } => return Ok(data),
                Envelope::Error { error } => error,
            };

            if !error_set_for(kind).contains(&error) {
                tracing::warn!(error = %error, "Hub answered with an error not declared for this request");
            }

            match error.error_code() {
                Some(ErrorCode::TokenInvalid) => {
                    if self.session.clear_token_if(token.as_deref()) {
                        tracing::info!("Session token rejected, logging out");
                    } else {
                        tracing::debug!("Rejected token was already replaced, keeping session");
                    }
                }
                Some(ErrorCode::TooManyRequests) => {
                    let attempt = retries + 1;
                    if self.options.retry.allows(attempt) {
                        let delay = self.options.retry.delay_for_attempt(attempt);
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Rate limited, resending"
                        );
                        tokio::time::sleep(delay).await;
                        retries = attempt;
                        continue;
                    }
                    tracing::warn!(retries, "Rate limited, giving up");
                }
                _ => {}
            }

            return Err(ClientError::Hub(error));
        }
    }

    /// Send a typed request and decode its response.
    pub async fn call<C: HubCall>(&self, request: C) -> Result<C::Response, ClientError> {
        let data = self.send_request(&request.into()).await?;
        decode_data(data).map_err(|e| {
            ClientError::Protocol(format!("Invalid {} response: {}", C::KIND, e))
        })
    }

    /// Log in and store the issued token. A failed login leaves the session
    /// untouched.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device: &str,
    ) -> Result<TokenResponse, ClientError> {
        let response = self
            .call(LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
                device: device.to_string(),
            })
            .await?;
        self.session.set_token(response.token.clone());
        tracing::info!("Logged in");
        Ok(response)
    }

    /// Log out and clear the token.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.call(LogoutRequest {}).await?;
        self.session.clear_token();
        tracing::info!("Logged out");
        Ok(())
    }

    /// Change the username. The hub invalidates the old token and issues a
    /// new one, which replaces it in the session.
    #[tracing::instrument(skip(self))]
    pub async fn change_username(&self, username: &str) -> Result<TokenResponse, ClientError> {
        let response = self
            .call(ChangeUsernameRequest {
                username: username.to_string(),
            })
            .await?;
        self.session.set_token(response.token.clone());
        tracing::info!("Username changed, session token replaced");
        Ok(response)
    }

    /// Turn an error into a user-facing notification, if it deserves one.
    pub fn handle_error(&self, error: &ClientError) {
        if let Some(notification) = notification_for(error) {
            self.sink.notify(notification);
        }
    }

    async fn round_trip(&self, body: &str, token: Option<&str>) -> Result<Envelope, ClientError> {
        let mut builder = self
            .http
            .post(&self.endpoint)
            .timeout(self.options.timeout);

        builder = match self.options.token_placement {
            // text/plain keeps browsers from sending a CORS preflight
            TokenPlacement::Query => builder
                .query(&[("token", token.unwrap_or(""))])
                .header(CONTENT_TYPE, "text/plain"),
            TokenPlacement::Header => {
                let builder = builder.header(CONTENT_TYPE, "application/json");
                match token {
                    Some(token) => builder.bearer_auth(token),
                    None => builder,
                }
            }
        };

        tracing::debug!(bytes = body.len(), "Sending request");
        let response = builder
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| ClientError::network(&e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(&e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::Protocol(format!("Invalid envelope (HTTP {}): {}", status.as_u16(), e))
        })
    }
}

impl std::fmt::Debug for HubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubClient")
            .field("endpoint", &self.endpoint)
            .field("options", &self.options)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::TracingSink;
    use crate::session::DEFAULT_STORAGE_KEY;
    use crate::storage::MemoryStorage;

    fn client(base_url: &str) -> HubClient {
        let session = Arc::new(Session::new(Arc::new(MemoryStorage::new()), DEFAULT_STORAGE_KEY));
        HubClient::new(ClientOptions::with_base_url(base_url), session, Arc::new(TracingSink))
    }

    #[test]
    fn test_client_options_default() {
        let opts = ClientOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(20));
        assert_eq!(opts.token_placement, TokenPlacement::Query);
        assert_eq!(opts.retry.max_retries, Some(10));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = HmConfig::default();
        config.hub.url = "http://hub.test".into();
        config.hub.timeout_secs = 3;
        config.hub.token_placement = TokenPlacement::Header;
        config.retry.retry_forever = true;

        let opts = ClientOptions::from_config(&config);
        assert_eq!(opts.base_url, "http://hub.test");
        assert_eq!(opts.timeout, Duration::from_secs(3));
        assert_eq!(opts.token_placement, TokenPlacement::Header);
        assert_eq!(opts.retry.max_retries, None);
    }

    #[test]
    fn test_endpoint_trailing_slash_stripped() {
        assert_eq!(client("http://localhost:8080/").endpoint(), "http://localhost:8080/api");
        assert_eq!(client("http://hub").endpoint(), "http://hub/api");
    }
}
