//! Request dispatcher for the Taverna backend API.
//!
//! `ApiClient` builds each request, attaches the stored JWT bearer token
//! (except on the login endpoint), interprets status codes, and returns
//! parsed JSON or a structured `ApiError`. A 401 invalidates the session
//! and forces navigation back to the login view.

pub mod client;
pub mod error;

pub use client::{ApiClient, ApiResponse, LOGIN_ENDPOINT};
pub use error::ApiError;

pub use reqwest::Method;
