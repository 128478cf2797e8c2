mod client;
mod model;

#[cfg(feature = "server")]
mod server;

use client::App;

fn main() {
    #[cfg(not(feature = "server"))]
    dioxus::launch(App);

    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        use std::sync::Arc;

        use dioxus_logger::tracing;

        use crate::server::{
            bot, config::Config, scheduler::weather_notifications,
            service::weather::client::WeatherClient, startup, state::AppState,
        };

        dotenvy::dotenv().ok();
        let config = Config::from_env()?;

        let db = startup::connect_to_database(&config).await?;
        let http_client = startup::setup_reqwest_client()?;
        let weather = WeatherClient::new(
            http_client.clone(),
            config.weather_api_key.clone(),
            &config.weather_api_url,
        );

        tracing::info!("Starting server for {}", config.app_url);

        match config.discord_token.as_deref() {
            Some(token) => {
                let (bot_client, discord_http) = bot::start::init_bot(
                    token,
                    config.discord_client_id,
                    db.clone(),
                    weather.clone(),
                )
                .await?;

                tokio::spawn(async move {
                    if let Err(e) = bot::start::start_bot(bot_client).await {
                        tracing::error!("Discord bot error: {}", e);
                    }
                });

                weather_notifications::start_scheduler(db.clone(), discord_http, weather.clone())
                    .await?;
            }
            None => tracing::warn!("DISCORD_TOKEN not set, Discord bot disabled"),
        }

        let state = AppState::new(db, Arc::new(config), http_client, weather);

        let router = dioxus::server::router(App).merge(server::router::router(state));

        Ok(router)
    })
}
