pub const SITE_NAME: &str = "Weather App";

/// `localStorage` key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
