//! Slash command definitions and their handlers.
//!
//! Handlers return a [`Reply`] instead of talking to Discord directly, so the
//! interaction handler owns the single response call and the handlers stay
//! testable without a gateway.

use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, CreateEmbed,
};

pub mod forecast;
pub mod subscribe;
pub mod unsubscribe;
pub mod weather;

/// Response to a slash command.
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
    pub ephemeral: bool,
}

impl Reply {
    /// Public reply carrying an embed.
    pub fn embed(embed: CreateEmbed) -> Self {
        Self {
            content: None,
            embed: Some(embed),
            ephemeral: false,
        }
    }

    /// Message visible only to the invoker.
    pub fn private(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embed: None,
            ephemeral: true,
        }
    }

    /// Error message visible only to the invoker.
    pub fn error(content: impl Into<String>) -> Self {
        Self::private(content)
    }
}

fn city_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "city", description).required(true)
}

/// Global slash commands registered on ready.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("weather")
            .description("Get current weather for a city")
            .add_option(city_option("City name")),
        CreateCommand::new("subscribe")
            .description("Subscribe to hourly weather notifications")
            .add_option(city_option("City name for notifications"))
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "email",
                    "The email you used to register for the weather app",
                )
                .required(true),
            ),
        CreateCommand::new("unsubscribe").description("Unsubscribe from weather notifications"),
        CreateCommand::new("forecast")
            .description("Get 5-day weather forecast")
            .add_option(city_option("City name")),
    ]
}

/// Trimmed, non-empty string option by name.
pub fn string_option<'a>(invocation: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    invocation
        .data
        .options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| option.value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_four_commands() {
        let names: Vec<_> = definitions()
            .iter()
            .map(|command| serde_json::to_value(command).unwrap()["name"].clone())
            .collect();

        assert_eq!(names, ["weather", "subscribe", "unsubscribe", "forecast"]);
    }

    #[test]
    fn subscribe_requires_city_and_email() {
        let subscribe = serde_json::to_value(&definitions()[1]).unwrap();
        let options = subscribe["options"].as_array().unwrap();

        assert_eq!(options.len(), 2);
        assert!(options.iter().all(|option| option["required"] == true));
        assert_eq!(options[1]["name"], "email");
    }
}
