//! Client library for the Taverna Telegram Mini App.
//!
//! This crate is the integration layer between the Mini App front-end and
//! the Taverna backend. It provides:
//! - `ApiClient`: authenticated request dispatcher with bearer token
//!   attachment and structured error surfacing
//! - `Authenticator`: Telegram initData login with session caching
//! - `Storage`: explicit persistent/session storage interfaces
//! - `HostRuntime`: narrow capability interface over the embedding host
//!
//! The backend issues a JWT on `POST /api/v1/auth/login-telegram`; every
//! other endpoint expects it as an `Authorization: Bearer` header.

pub mod api;
pub mod auth;
pub mod config;
pub mod host;
pub mod models;
pub mod storage;

#[cfg(test)]
pub mod testing;

pub use api::{ApiClient, ApiError, ApiResponse};
pub use auth::Authenticator;
pub use config::Config;
pub use host::HostRuntime;
pub use models::UserProfile;
pub use storage::{FileStorage, MemoryStorage, Storage};
