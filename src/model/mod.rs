//! DTOs shared between the server API and the web client.
//!
//! Every type here is serialized as camelCase JSON to keep the REST surface
//! stable for existing clients. Schemas are derived for OpenAPI only when the
//! `server` feature is enabled.

pub mod admin;
pub mod api;
pub mod auth;
pub mod cccd;
pub mod discord;
pub mod user;
pub mod weather;
