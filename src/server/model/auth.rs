//! Authentication parameters and token claims.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    model::auth::{LoginDto, RegisterDto},
    server::{
        error::validation::{ValidationError, Validator},
        util::validate::{is_valid_email, non_blank, normalize_email, parse_date_of_birth, GENDERS},
    },
};

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: i32,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct RegisterParam {
    pub username: String,
    pub email: String,
    pub password: String,
    pub cccd: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

impl RegisterParam {
    /// Validates a registration body.
    ///
    /// The username may be omitted when a CCCD number is supplied; one is then
    /// generated from the current time. `fullName` takes precedence over `name`.
    pub fn from_dto(dto: RegisterDto) -> Result<Self, ValidationError> {
        let cccd = non_blank(dto.cccd).map(|c| cccd_digits(&c));
        let username = non_blank(dto.username);
        let email = normalize_email(&dto.email);
        let date_of_birth = non_blank(dto.date_of_birth);
        let gender = non_blank(dto.gender);

        let mut v = Validator::new();
        if cccd.is_none() || username.is_some() {
            let len = username.as_deref().map(|u| u.chars().count()).unwrap_or(0);
            v.check(
                (3..=30).contains(&len),
                "username",
                "Username must be between 3 and 30 characters",
            );
        }
        v.check(
            cccd.as_deref().is_none_or(|c| !c.is_empty()),
            "cccd",
            "CCCD number must contain digits",
        );
        v.check(is_valid_email(&email), "email", "Please provide a valid email");
        v.check(
            dto.password.chars().count() >= 6,
            "password",
            "Password must be at least 6 characters long",
        );
        if let Some(gender) = &gender {
            v.check(
                GENDERS.contains(&gender.as_str()),
                "gender",
                "Gender must be one of Nam, Nữ, Khác",
            );
        }
        let parsed_dob = date_of_birth.as_deref().and_then(parse_date_of_birth);
        v.check(
            date_of_birth.is_none() || parsed_dob.is_some(),
            "dateOfBirth",
            "Date of birth must be YYYY-MM-DD or DD/MM/YYYY",
        );
        v.finish()?;

        let username = username
            .unwrap_or_else(|| format!("cccd_{}", Utc::now().timestamp_millis()));

        Ok(Self {
            username,
            email,
            password: dto.password,
            cccd,
            full_name: non_blank(dto.full_name).or_else(|| non_blank(dto.name)),
            date_of_birth: parsed_dob,
            gender,
            address: non_blank(dto.address),
        })
    }
}

/// Reduces a CCCD number to its digits.
pub fn cccd_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validated email and password login.
#[derive(Debug, Clone)]
pub struct LoginParam {
    pub email: String,
    pub password: String,
}

impl LoginParam {
    pub fn from_dto(dto: LoginDto) -> Result<Self, ValidationError> {
        let email = normalize_email(&dto.email);

        let mut v = Validator::new();
        v.check(is_valid_email(&email), "email", "Please provide a valid email");
        v.check(!dto.password.is_empty(), "password", "Password is required");
        v.finish()?;

        Ok(Self {
            email,
            password: dto.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> RegisterDto {
        RegisterDto {
            username: Some("alice".to_string()),
            email: " Alice@Example.com ".to_string(),
            password: "secret1".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn normalizes_valid_registration() {
        let param = RegisterParam::from_dto(RegisterDto {
            name: Some("Alice A".to_string()),
            date_of_birth: Some("09/03/2001".to_string()),
            gender: Some("Nữ".to_string()),
            ..dto()
        })
        .unwrap();

        assert_eq!(param.username, "alice");
        assert_eq!(param.email, "alice@example.com");
        assert_eq!(param.full_name.as_deref(), Some("Alice A"));
        assert_eq!(param.date_of_birth, NaiveDate::from_ymd_opt(2001, 3, 9));
    }

    #[test]
    fn reports_every_failing_field() {
        let err = RegisterParam::from_dto(RegisterDto {
            username: Some("al".to_string()),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            ..Default::default()
        })
        .unwrap_err();

        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "email", "password"]);
    }

    #[test]
    fn generates_username_for_cccd_registration() {
        let param = RegisterParam::from_dto(RegisterDto {
            username: None,
            cccd: Some("0012-0300-4567".to_string()),
            ..dto()
        })
        .unwrap();

        assert!(param.username.starts_with("cccd_"));
        assert_eq!(param.cccd.as_deref(), Some("001203004567"));
    }

    #[test]
    fn rejects_cccd_without_digits() {
        let err = RegisterParam::from_dto(RegisterDto {
            username: None,
            cccd: Some("abc".to_string()),
            ..dto()
        })
        .unwrap_err();

        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["cccd"]);
    }

    #[test]
    fn rejects_unknown_gender() {
        let result = RegisterParam::from_dto(RegisterDto {
            gender: Some("X".to_string()),
            ..dto()
        });

        assert!(result.is_err());
    }
}
