//! Slash command dispatch.

use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;
use serenity::all::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    Interaction,
};

use crate::server::{
    bot::command::{self, Reply},
    service::weather::client::WeatherClient,
};

/// Runs the invoked command and sends its reply. Non-command interactions are ignored.
pub async fn handle_interaction(
    db: &DatabaseConnection,
    weather: &WeatherClient,
    ctx: Context,
    interaction: Interaction,
) {
    let Interaction::Command(invocation) = interaction else {
        return;
    };

    tracing::debug!(
        "Slash command /{} from {}",
        invocation.data.name,
        invocation.user.id
    );

    let reply = dispatch(db, weather, &invocation).await;

    let mut message = CreateInteractionResponseMessage::new().ephemeral(reply.ephemeral);
    if let Some(content) = reply.content {
        message = message.content(content);
    }
    if let Some(embed) = reply.embed {
        message = message.embed(embed);
    }

    if let Err(e) = invocation
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        tracing::error!("Failed to reply to /{}: {}", invocation.data.name, e);
    }
}

async fn dispatch(
    db: &DatabaseConnection,
    weather: &WeatherClient,
    invocation: &CommandInteraction,
) -> Reply {
    let city = command::string_option(invocation, "city");

    match invocation.data.name.as_str() {
        "weather" => command::weather::run(weather, city).await,
        "forecast" => command::forecast::run(weather, city).await,
        "subscribe" => {
            let email = command::string_option(invocation, "email");
            command::subscribe::run(
                db,
                weather,
                invocation.user.id.get(),
                invocation.channel_id.get(),
                city,
                email,
            )
            .await
        }
        "unsubscribe" => command::unsubscribe::run(db, invocation.user.id.get()).await,
        _ => Reply::error("Unknown command!"),
    }
}
