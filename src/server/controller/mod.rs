pub mod admin;
pub mod auth;
pub mod cccd;
pub mod discord;
pub mod user;
pub mod weather;
