//! Capability interface over the embedding host runtime.
//!
//! The Mini App runs inside a host (the Telegram WebApp bridge) that
//! supplies the signed identity assertion and owns user-facing alerts
//! and navigation. The library only ever touches the host through this
//! trait, so tests substitute a recording fake.

/// What the library needs from the host, and nothing more.
pub trait HostRuntime: Send + Sync {
    /// The signed `initData` payload proving the current user's identity,
    /// if the host provided one.
    fn init_data(&self) -> Option<String>;

    /// Show a modal alert to the user.
    fn show_alert(&self, message: &str);

    /// Navigate to the login view after session invalidation.
    fn navigate_to_login(&self);
}
