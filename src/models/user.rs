use serde::{Deserialize, Serialize};

/// User profile returned by the backend on login.
///
/// Mirrored in both the session cache (`tgUser`) and persistent storage
/// (`current_user`). A cached profile is only trusted while a session
/// token is also present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub telegram_id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl UserProfile {
    /// Display name for UI: "First Last", falling back to the username,
    /// falling back to the numeric id.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (first, Some(last)) if !first.is_empty() => format!("{} {}", first, last),
            (first, None) if !first.is_empty() => first.clone(),
            _ => self
                .username
                .clone()
                .unwrap_or_else(|| self.telegram_id.to_string()),
        }
    }
}

/// Response body of `POST /api/v1/auth/login-telegram`.
///
/// All fields are optional so a rejection body (`detail` only) parses as
/// cleanly as a success body (`access_token` + `user`).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub detail: Option<String>,
}
