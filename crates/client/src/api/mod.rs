//! HTTP client for the marketplace backend.
//!
//! JSON request/response over `reqwest`, with the session token attached
//! as a bearer header when one is set. Non-2xx responses become
//! [`ApiError::Status`] carrying the backend's `message` field when the
//! body provides one.

mod error;
pub mod types;

pub use error::ApiError;

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::config::ClientConfig;

/// Client for the marketplace backend's JSON endpoints.
///
/// Cheaply cloneable; every state object shares one instance so the
/// session token set at login is attached everywhere.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                token: RwLock::new(None),
            }),
        }
    }

    /// Attach a session token to all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Drop the session token.
    pub fn clear_token(&self) {
        *self
            .inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Bare HTTP client for requests outside the backend (geolocation).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Whether a session token is currently attached.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that does not match `T`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let request = self
            .inner
            .client
            .get(self.endpoint(path))
            .query(query);
        self.execute(request).await
    }

    /// `POST` a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that does not match `T`.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.post(self.endpoint(path)).json(body);
        self.execute(request).await
    }

    /// `PUT` a JSON body and parse the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx status, or a body
    /// that does not match `T`.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.inner.client.put(self.endpoint(path)).json(body);
        self.execute(request).await
    }

    /// `DELETE` a resource, discarding any response body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-2xx status.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.inner.client.delete(self.endpoint(path));

        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        Ok(())
    }

    /// Resolve `path` against the configured base URL.
    fn endpoint(&self, path: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Attach the bearer token (when set) and send.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let request = {
            let token = self
                .inner
                .token
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            match token.as_ref() {
                Some(token) => request.bearer_auth(token.expose_secret()),
                None => request,
            }
        };

        Ok(request.send().await?)
    }

    /// Send a request and parse the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();

        // Body first, for diagnostics on both error paths
        let body = response.text().await?;

        if !status.is_success() {
            debug!(status = %status, "backend rejected request");
            return Err(status_error(status, &body));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "failed to parse backend response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

/// Build an [`ApiError::Status`], preferring the backend's `message` field.
fn status_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| body.chars().take(200).collect::<String>(),
        |parsed| parsed.message,
    );

    ApiError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base: &str) -> ApiClient {
        let config = ClientConfig::for_api_url(base).expect("valid url");
        ApiClient::new(&config)
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = test_client("http://localhost:5000/");
        assert_eq!(
            client.endpoint("/api/cart"),
            "http://localhost:5000/api/cart"
        );
    }

    #[test]
    fn test_token_lifecycle() {
        let client = test_client("http://localhost:5000");
        assert!(!client.has_token());

        client.set_token(SecretString::from("session-token".to_string()));
        assert!(client.has_token());

        client.clear_token();
        assert!(!client.has_token());
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = test_client("http://localhost:5000");
        client.set_token(SecretString::from("session-token".to_string()));
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("session-token"));
    }

    #[test]
    fn test_status_error_prefers_message_field() {
        let err = status_error(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"message":"quantity must be positive"}"#,
        );
        match err {
            ApiError::Status { message, .. } => {
                assert_eq!(message, "quantity must be positive");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_error_falls_back_to_body() {
        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        match err {
            ApiError::Status { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
