//! Boundary types exchanged with the Taverna backend.
//!
//! Only the fields the Mini App actually uses are modeled; the backend
//! sends more and serde ignores the rest.

pub mod user;

pub use user::{LoginResponse, UserProfile};
