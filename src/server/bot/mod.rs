//! Discord bot serving weather slash commands.
//!
//! The bot is initialized during server startup and runs in a separate tokio task
//! so it never blocks the HTTP server. Its HTTP client is shared with the
//! notification scheduler, which posts to subscribers' channels without opening a
//! second connection to Discord.
//!
//! # Gateway Intents
//!
//! Only `GUILDS` is requested. Slash commands arrive as interactions and need no
//! privileged intents.

pub mod command;
pub mod handler;
pub mod start;
