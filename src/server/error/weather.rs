use thiserror::Error;

/// Failures talking to the weather provider.
#[derive(Error, Debug, Clone)]
pub enum WeatherError {
    /// `WEATHER_API_KEY` is not configured.
    #[error("Weather API key is not configured. Please check server configuration.")]
    ApiKeyMissing,

    /// The provider rejected the key; latched until restart.
    #[error("Invalid API key. Please see https://openweathermap.org/faq#error401 for more info.")]
    ApiKeyInvalid,

    /// The provider answered with a non-success status.
    ///
    /// # Fields
    /// - HTTP status code
    /// - Message from the provider body, or the raw body
    #[error("{1}")]
    Upstream(u16, String),

    /// Network failure, timeout or undecodable body.
    #[error("{0}")]
    Request(String),
}

impl WeatherError {
    /// Whether the failure is caused by key configuration rather than the request.
    pub fn is_api_key_error(&self) -> bool {
        matches!(self, Self::ApiKeyMissing | Self::ApiKeyInvalid)
    }
}
