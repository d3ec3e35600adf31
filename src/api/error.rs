use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session invalidated")]
    Unauthorized,

    #[error("{0}")]
    Request(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Host runtime provided no initData")]
    MissingInitData,

    #[error("Login rejected: {0}")]
    LoginRejected(String),
}

impl ApiError {
    /// Build a `Request` error from a non-2xx response body.
    ///
    /// The backend reports failures as `{"detail": "..."}`; anything else
    /// falls back to a generic status message.
    pub fn from_error_body(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            });
        ApiError::Request(detail.unwrap_or_else(|| format!("HTTP error {}", status.as_u16())))
    }
}
