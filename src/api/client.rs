use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::host::HostRuntime;
use crate::storage::{Storage, CURRENT_USER_KEY, JWT_TOKEN_KEY, SESSION_USER_KEY};

use super::ApiError;

/// Login endpoint; the one request that must not carry a bearer token.
pub const LOGIN_ENDPOINT: &str = "/api/v1/auth/login-telegram";

/// HTTP request timeout in seconds.
/// 30s allows for slow backend cold starts while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Success side of an API call: a JSON payload, or the empty 204 marker.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    NoContent,
}

/// Dispatcher for authenticated backend requests.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    persistent: Arc<dyn Storage>,
    session: Arc<dyn Storage>,
    host: Arc<dyn HostRuntime>,
}

impl ApiClient {
    /// Create a new dispatcher against `base_url`.
    ///
    /// `persistent` holds the `jwt_token` and `current_user` keys across
    /// restarts; `session` is the session-scoped profile cache; `host`
    /// supplies alerts and login navigation.
    pub fn new(
        base_url: impl Into<String>,
        persistent: Arc<dyn Storage>,
        session: Arc<dyn Storage>,
        host: Arc<dyn HostRuntime>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            persistent,
            session,
            host,
        })
    }

    pub(crate) fn persistent(&self) -> &Arc<dyn Storage> {
        &self.persistent
    }

    pub(crate) fn session(&self) -> &Arc<dyn Storage> {
        &self.session
    }

    pub(crate) fn host(&self) -> &Arc<dyn HostRuntime> {
        &self.host
    }

    /// Dispatch a request and interpret the response.
    ///
    /// Every failure is logged here and surfaced to the user through a
    /// host alert before being returned - callers get a `Result`, never a
    /// panic. The one exception is `Unauthorized`, which navigates to the
    /// login view instead of alerting.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        match self.dispatch(endpoint, method, body).await {
            Ok(response) => Ok(response),
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(e) => {
                error!(endpoint, error = %e, "API call failed");
                self.host
                    .show_alert(&format!("Error: {}. Try restarting the app.", e));
                Err(e)
            }
        }
    }

    async fn dispatch(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        // Attach the bearer token to everything except login itself.
        if !endpoint.contains("login") {
            if let Some(token) = self.persistent.get(JWT_TOKEN_KEY) {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Token expired or invalid. Terminal for this call: clear the
            // session and send the user back to login.
            warn!(endpoint, "401 Unauthorized, invalidating session");
            self.invalidate_session();
            self.host.navigate_to_login();
            return Err(ApiError::Unauthorized);
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(ApiResponse::NoContent);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_error_body(status, &text));
        }

        let value: Value = response.json().await?;
        debug!(endpoint, "API call succeeded");
        Ok(ApiResponse::Json(value))
    }

    /// Remove the token and both profile copies. Best-effort: a storage
    /// failure is logged, not propagated.
    pub(crate) fn invalidate_session(&self) {
        let targets: [(&Arc<dyn Storage>, &str); 3] = [
            (&self.persistent, JWT_TOKEN_KEY),
            (&self.persistent, CURRENT_USER_KEY),
            (&self.session, SESSION_USER_KEY),
        ];
        for (store, key) in targets {
            if let Err(e) = store.remove(key) {
                warn!(key, error = %e, "Failed to clear storage key");
            }
        }
    }

    // ===== Convenience wrappers =====

    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.call(endpoint, Method::GET, None).await
    }

    pub async fn post(&self, endpoint: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.call(endpoint, Method::POST, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.call(endpoint, Method::DELETE, None).await
    }

    /// GET an endpoint and deserialize its JSON payload.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        match self.get(endpoint).await? {
            ApiResponse::Json(value) => Ok(serde_json::from_value(value)?),
            ApiResponse::NoContent => Err(ApiError::Request("Response had no payload".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::RecordingHost;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(
        base_url: &str,
    ) -> (
        ApiClient,
        Arc<MemoryStorage>,
        Arc<MemoryStorage>,
        Arc<RecordingHost>,
    ) {
        let persistent = Arc::new(MemoryStorage::new());
        let session = Arc::new(MemoryStorage::new());
        let host = Arc::new(RecordingHost::with_init_data("init=1"));
        let client = ApiClient::new(
            base_url,
            persistent.clone() as Arc<dyn Storage>,
            session.clone() as Arc<dyn Storage>,
            host.clone() as Arc<dyn HostRuntime>,
        )
        .expect("client should build");
        (client, persistent, session, host)
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_present() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/products"))
            .and(header("Authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let (client, persistent, _, _) = test_client(&server.uri());
        persistent.set(JWT_TOKEN_KEY, "t1").unwrap();

        let response = client.get("/api/v1/products").await.unwrap();
        assert_eq!(response, ApiResponse::Json(serde_json::json!({"ok": true})));
    }

    #[tokio::test]
    async fn test_login_endpoint_never_carries_token() {
        let server = MockServer::start().await;
        // Any login request carrying an Authorization header hits this mock
        // and fails the expectation check.
        Mock::given(method("POST"))
            .and(path(LOGIN_ENDPOINT))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(LOGIN_ENDPOINT))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": "t2"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (client, persistent, _, _) = test_client(&server.uri());
        persistent.set(JWT_TOKEN_KEY, "t1").unwrap();

        let body = serde_json::json!({"initData": "init=1"});
        client.post(LOGIN_ENDPOINT, &body).await.unwrap();
    }

    #[tokio::test]
    async fn test_401_clears_storage_and_navigates_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cart"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (client, persistent, session, host) = test_client(&server.uri());
        persistent.set(JWT_TOKEN_KEY, "t1").unwrap();
        persistent.set(CURRENT_USER_KEY, "{}").unwrap();
        session.set(SESSION_USER_KEY, "{}").unwrap();

        let err = client.get("/api/v1/cart").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));

        assert!(persistent.get(JWT_TOKEN_KEY).is_none());
        assert!(persistent.get(CURRENT_USER_KEY).is_none());
        assert!(session.get(SESSION_USER_KEY).is_none());
        assert_eq!(host.navigation_count(), 1);
        // 401 navigates instead of alerting.
        assert!(host.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_204_yields_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/cart/items/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let (client, _, _, host) = test_client(&server.uri());
        let response = client.delete("/api/v1/cart/items/7").await.unwrap();
        assert_eq!(response, ApiResponse::NoContent);
        assert!(host.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_error_body_detail_surfaces_and_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "not found"})),
            )
            .mount(&server)
            .await;

        let (client, _, _, host) = test_client(&server.uri());
        let err = client.get("/x").await.unwrap_err();
        assert_eq!(err.to_string(), "not found");

        let alerts = host.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("not found"));
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_status_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        let (client, _, _, _) = test_client(&server.uri());
        let err = client.get("/x").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error 500");
    }

    #[tokio::test]
    async fn test_network_failure_is_recovered_and_alerted() {
        // Port 1 is unassigned; the connection is refused immediately.
        let (client, _, _, host) = test_client("http://127.0.0.1:1");
        let err = client.get("/api/v1/products").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(host.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_deserializes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"telegram_id": 5, "first_name": "Olena"}),
            ))
            .mount(&server)
            .await;

        let (client, _, _, _) = test_client(&server.uri());
        let user: crate::models::UserProfile = client.fetch("/api/v1/auth/me").await.unwrap();
        assert_eq!(user.telegram_id, 5);
        assert_eq!(user.first_name, "Olena");
    }
}
