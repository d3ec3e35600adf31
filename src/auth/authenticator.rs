use reqwest::Method;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ApiError, ApiResponse, LOGIN_ENDPOINT};
use crate::models::{LoginResponse, UserProfile};
use crate::storage::{CURRENT_USER_KEY, JWT_TOKEN_KEY, SESSION_USER_KEY};

/// Fallback alert when the server gives no usable error detail.
const LOGIN_FAILED_MESSAGE: &str = "Could not sign in. Please restart the app.";

/// Authenticates the Mini App user against the backend.
pub struct Authenticator {
    api: ApiClient,
}

impl Authenticator {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Establish a session, returning the user profile on success.
    ///
    /// Each call is a complete attempt: either the session-cached profile
    /// is returned (only while a token is also stored), or one network
    /// login is performed. Every failure is logged, surfaced to the user,
    /// and reported as `None`.
    pub async fn authenticate(&self) -> Option<UserProfile> {
        match self.try_authenticate().await {
            Ok(user) => Some(user),
            Err(e) => {
                self.surface(e);
                None
            }
        }
    }

    /// Drop the session: token and both profile copies.
    pub fn logout(&self) {
        info!("logout: clearing session");
        self.api.invalidate_session();
    }

    async fn try_authenticate(&self) -> Result<UserProfile, ApiError> {
        let init_data = self
            .api
            .host()
            .init_data()
            .ok_or(ApiError::MissingInitData)?;

        if let Some(cached) = self.api.session().get(SESSION_USER_KEY) {
            // A cached profile is only valid while a token is also present.
            if self.api.persistent().get(JWT_TOKEN_KEY).is_some() {
                match serde_json::from_str::<UserProfile>(&cached) {
                    Ok(user) => {
                        debug!(telegram_id = user.telegram_id, "authenticate: session cache hit");
                        return Ok(user);
                    }
                    Err(e) => {
                        warn!(error = %e, "authenticate: discarding unparseable cached profile")
                    }
                }
            }
            if let Err(e) = self.api.session().remove(SESSION_USER_KEY) {
                warn!(error = %e, "authenticate: failed to drop stale cached profile");
            }
        }

        self.login(&init_data).await
    }

    /// Perform the network login and persist the issued session.
    async fn login(&self, init_data: &str) -> Result<UserProfile, ApiError> {
        let body = serde_json::json!({ "initData": init_data });
        let response = self
            .api
            .call(LOGIN_ENDPOINT, Method::POST, Some(&body))
            .await?;

        let ApiResponse::Json(value) = response else {
            return Err(ApiError::LoginRejected("Empty login response".to_string()));
        };

        let parsed: LoginResponse = serde_json::from_value(value.clone())?;
        let (Some(token), Some(user)) = (parsed.access_token, parsed.user) else {
            error!(response = %value, "authenticate: login rejected");
            return Err(ApiError::LoginRejected(
                parsed
                    .detail
                    .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_string()),
            ));
        };

        info!(telegram_id = user.telegram_id, "authenticate: login succeeded");

        match serde_json::to_string(&user) {
            Ok(serialized) => {
                if let Err(e) = self.api.session().set(SESSION_USER_KEY, &serialized) {
                    warn!(error = %e, "authenticate: failed to cache profile in session");
                }
                if let Err(e) = self.api.persistent().set(CURRENT_USER_KEY, &serialized) {
                    warn!(error = %e, "authenticate: failed to persist profile");
                }
            }
            Err(e) => warn!(error = %e, "authenticate: failed to serialize profile"),
        }
        if let Err(e) = self.api.persistent().set(JWT_TOKEN_KEY, &token) {
            warn!(error = %e, "authenticate: failed to persist token");
        }

        Ok(user)
    }

    /// Surface a failure to the user. Dispatcher-level failures
    /// (`Unauthorized`, `Request`, `Network`) were already logged and
    /// alerted or navigated by `ApiClient::call`.
    fn surface(&self, err: ApiError) {
        match err {
            ApiError::MissingInitData => {
                error!("authenticate: host provided no initData");
                self.api
                    .host()
                    .show_alert("Could not read Telegram data. Please restart the app.");
            }
            ApiError::LoginRejected(message) => {
                self.api.host().show_alert(&message);
            }
            ApiError::Json(e) => {
                error!(error = %e, "authenticate: unreadable login response");
                self.api.host().show_alert(LOGIN_FAILED_MESSAGE);
            }
            _ => {}
        }
    }
}
