#[cfg(feature = "web")]
pub mod admin;
#[cfg(feature = "web")]
pub mod auth;
#[cfg(feature = "web")]
pub mod cache;
#[cfg(feature = "web")]
pub mod cccd;
#[cfg(feature = "web")]
pub mod discord;
#[cfg(feature = "web")]
pub mod helper;
#[cfg(feature = "web")]
pub mod user;
#[cfg(feature = "web")]
pub mod weather;
