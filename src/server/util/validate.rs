//! Field-level checks shared by request validation.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parses a date of birth given as `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .ok()
}

/// Whether `value` is a 24-hour `HH:MM` time.
pub fn is_valid_notification_time(value: &str) -> bool {
    value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok()
}

/// Genders accepted at registration.
pub const GENDERS: [&str; 3] = ["Nam", "Nữ", "Khác"];

/// Trims a string and maps blank values to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn parses_both_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2001, 3, 9);

        assert_eq!(parse_date_of_birth("2001-03-09"), expected);
        assert_eq!(parse_date_of_birth("09/03/2001"), expected);
        assert_eq!(parse_date_of_birth("2001/03/09"), None);
    }

    #[test]
    fn validates_notification_times() {
        assert!(is_valid_notification_time("07:30"));
        assert!(is_valid_notification_time("23:59"));
        assert!(!is_valid_notification_time("7:30"));
        assert!(!is_valid_notification_time("24:00"));
        assert!(!is_valid_notification_time("07:30:00"));
    }
}
