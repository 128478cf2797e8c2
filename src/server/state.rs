//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - Configuration loaded from the environment
//! - HTTP client for the OCR API
//! - Weather client with its response caches
//! - Admin dashboard caches

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::server::{
    config::Config,
    service::{admin::AdminCache, weather::client::WeatherClient},
};

/// Application state containing shared resources and dependencies.
///
/// All fields use cheap-to-clone types:
/// - `DatabaseConnection` is a connection pool (clones share the pool)
/// - `Config` sits behind an `Arc`
/// - `reqwest::Client` uses an `Arc` internally
/// - `WeatherClient` and `AdminCache` share their `moka` caches between clones
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Configuration loaded at startup.
    pub config: Arc<Config>,

    /// HTTP client for external API requests.
    ///
    /// Configured with a 15 second timeout and the application user agent.
    pub http_client: reqwest::Client,

    /// OpenWeatherMap client shared by the API and the Discord bot.
    pub weather: WeatherClient,

    /// Short-lived caches for admin dashboard aggregates.
    pub admin_cache: AdminCache,
}

impl AppState {
    /// Creates a new application state with the provided dependencies.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Application configuration
    /// - `http_client` - HTTP client for external API requests
    /// - `weather` - OpenWeatherMap client
    ///
    /// # Returns
    /// - `AppState` - Initialized application state ready for use
    pub fn new(
        db: DatabaseConnection,
        config: Arc<Config>,
        http_client: reqwest::Client,
        weather: WeatherClient,
    ) -> Self {
        Self {
            db,
            config,
            http_client,
            weather,
            admin_cache: AdminCache::new(),
        }
    }
}
