//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! transformed to DTOs at the controller boundary. Parameter types carry validated
//! input from controllers into services.

pub mod admin;
pub mod admin_audit;
pub mod api_event;
pub mod auth;
pub mod discord;
pub mod favorite;
pub mod search_history;
pub mod user;
pub mod weather;
