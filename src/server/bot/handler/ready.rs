//! Ready event handler for bot initialization.
//!
//! Fired once the gateway handshake completes. Registers the global slash
//! commands and sets the bot's presence.

use dioxus_logger::tracing;
use serenity::all::{ActivityData, Command, Context, Ready};

use crate::server::bot::command;

/// Handles the ready event when the bot connects to Discord.
///
/// A failed command registration is logged; the bot keeps running with whatever
/// commands Discord already has.
pub async fn handle_ready(ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    ctx.set_activity(Some(ActivityData::watching("the weather")));

    match Command::set_global_commands(&ctx.http, command::definitions()).await {
        Ok(commands) => tracing::info!("Registered {} slash commands", commands.len()),
        Err(e) => tracing::error!("Error registering slash commands: {}", e),
    }
}
