//! Session authentication for the Mini App.
//!
//! `Authenticator` turns the host runtime's signed `initData` payload
//! into a logged-in session: it checks the session-scoped profile cache,
//! falls back to a network login, and persists the issued token.

pub mod authenticator;

pub use authenticator::Authenticator;
