//! Storage interfaces for session state.
//!
//! The Mini App keeps two stores with different lifetimes:
//! - persistent storage (`FileStorage`): survives restarts, holds the
//!   `jwt_token` and `current_user` keys
//! - session-scoped cache (`MemoryStorage`): cleared when the process
//!   ends, holds the `tgUser` key
//!
//! Both are injected as `Arc<dyn Storage>` so tests can substitute
//! in-memory fakes.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Persistent storage key for the bearer token.
pub const JWT_TOKEN_KEY: &str = "jwt_token";

/// Persistent storage key for the JSON-serialized user profile.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Session cache key for the JSON-serialized user profile.
pub const SESSION_USER_KEY: &str = "tgUser";

/// String key-value store with web-storage semantics.
///
/// `set` and `remove` are best-effort for callers: implementations report
/// failures through the `Result` and callers log and continue, since a
/// storage failure must never abort a request.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}
