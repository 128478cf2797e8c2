//! User domain models and parameters.
//!
//! Provides the account model with its embedded preferences, last location and
//! Discord link, plus parameter types for registration, moderation and listing.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    model::{
        admin::{AdminUserDto, UpdateUserDto, UserListDto},
        user::{
            LastLocationDto, PreferencesDto, PublicUserDto, UpdateLastLocationDto,
            UpdatePreferencesDto,
        },
    },
    server::{
        error::validation::{ValidationError, Validator},
        model::discord::DiscordLink,
        util::validate::{is_valid_email, non_blank, normalize_email},
    },
};

/// Account role stored on the user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parses a stored role; anything unrecognized is treated as a plain user.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Display preferences.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    /// `celsius` or `fahrenheit`.
    pub temperature_unit: String,
    pub language: String,
}

impl Preferences {
    pub fn into_dto(self) -> PreferencesDto {
        PreferencesDto {
            temperature_unit: self.temperature_unit,
            language: self.language,
        }
    }
}

/// Last location the client reported for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct LastLocation {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub country: String,
    pub updated_at: DateTime<Utc>,
}

impl LastLocation {
    pub fn into_dto(self) -> LastLocationDto {
        LastLocationDto {
            lat: self.lat,
            lon: self.lon,
            city: self.city,
            country: self.country,
            updated_at: self.updated_at,
        }
    }
}

/// Application account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// bcrypt hash; never leaves the server.
    pub password_hash: String,
    pub cccd: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub is_verified: bool,
    pub banned: bool,
    pub role: Role,
    pub preferences: Preferences,
    pub last_location: Option<LastLocation>,
    pub discord: DiscordLink,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Converts an entity model to a user domain model at the repository boundary.
    ///
    /// The last location is only populated when coordinates, city and country
    /// are all present.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        let last_location = match (
            entity.last_lat,
            entity.last_lon,
            entity.last_city,
            entity.last_country,
        ) {
            (Some(lat), Some(lon), Some(city), Some(country)) => Some(LastLocation {
                lat,
                lon,
                city,
                country,
                updated_at: entity.last_location_at.unwrap_or(entity.updated_at),
            }),
            _ => None,
        };

        Self {
            id: entity.id,
            username: entity.username,
            email: entity.email,
            password_hash: entity.password_hash,
            cccd: entity.cccd,
            date_of_birth: entity.date_of_birth,
            gender: entity.gender,
            address: entity.address,
            full_name: entity.full_name,
            phone_number: entity.phone_number,
            is_verified: entity.is_verified,
            banned: entity.banned,
            role: Role::from_db(&entity.role),
            preferences: Preferences {
                temperature_unit: entity.temperature_unit,
                language: entity.language,
            },
            last_location,
            discord: DiscordLink {
                user_id: entity.discord_user_id,
                channel_id: entity.discord_channel_id,
                subscribed: entity.discord_subscribed,
                notification_city: entity.discord_notification_city,
                notification_time: entity.discord_notification_time,
                last_notification: entity.discord_last_notification,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Whether the user may use admin routes.
    ///
    /// Admin access is granted by the stored role or by listing the email in
    /// `ADMIN_EMAILS` (compared case-insensitively).
    pub fn is_admin(&self, admin_emails: &[String]) -> bool {
        self.role == Role::Admin
            || admin_emails
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&self.email))
    }

    /// Converts to the profile returned to the account owner.
    ///
    /// `role` reports effective access, so `ADMIN_EMAILS` members read as `admin`.
    pub fn into_public_dto(self, admin_emails: &[String]) -> PublicUserDto {
        let role = if self.is_admin(admin_emails) {
            Role::Admin
        } else {
            self.role
        };

        PublicUserDto {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            preferences: self.preferences.into_dto(),
            role: role.as_str().to_string(),
            created_at: self.created_at,
        }
    }

    /// Converts to the moderator view.
    pub fn into_admin_dto(self) -> AdminUserDto {
        AdminUserDto {
            id: self.id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            cccd: self.cccd,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
            phone_number: self.phone_number,
            is_verified: self.is_verified,
            banned: self.banned,
            role: self.role.as_str().to_string(),
            preferences: self.preferences.into_dto(),
            discord: self.discord.into_dto(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Validated registration input with the password already hashed.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub username: String,
    /// Trimmed and lowercased.
    pub email: String,
    pub password_hash: String,
    pub cccd: Option<String>,
    pub full_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

/// Ban status filter for the admin user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatusFilter {
    Banned,
    Active,
}

/// Query for the admin user list.
#[derive(Debug, Clone)]
pub struct UserFilterParam {
    /// Case-insensitive substring over username, email and full name.
    pub q: Option<String>,
    pub status: Option<UserStatusFilter>,
    /// One-based page number.
    pub page: u64,
    pub per_page: u64,
}

/// Preference update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePreferencesParam {
    pub temperature_unit: Option<String>,
    pub language: Option<String>,
}

impl UpdatePreferencesParam {
    pub fn from_dto(dto: UpdatePreferencesDto) -> Result<Self, ValidationError> {
        let mut v = Validator::new();
        Self::check(&dto, &mut v);
        v.finish()?;

        Ok(Self {
            temperature_unit: dto.temperature_unit,
            language: dto.language,
        })
    }

    fn check(dto: &UpdatePreferencesDto, v: &mut Validator) {
        if let Some(unit) = &dto.temperature_unit {
            v.check(
                unit == "celsius" || unit == "fahrenheit",
                "temperatureUnit",
                "Temperature unit must be celsius or fahrenheit",
            );
        }
        if let Some(language) = &dto.language {
            v.check(
                (2..=5).contains(&language.chars().count()),
                "language",
                "Language must be 2-5 characters",
            );
        }
    }
}

/// Validated last-location update.
#[derive(Debug, Clone, PartialEq)]
pub struct LastLocationParam {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub country: String,
}

impl LastLocationParam {
    pub fn from_dto(dto: UpdateLastLocationDto) -> Result<Self, ValidationError> {
        let city = dto.city.trim().to_string();
        let country = dto.country.trim().to_string();

        let mut v = Validator::new();
        v.check(dto.lat.is_some(), "lat", "Latitude must be a number");
        v.check(dto.lon.is_some(), "lon", "Longitude must be a number");
        v.check(!city.is_empty(), "city", "City name is required");
        v.check(!country.is_empty(), "country", "Country is required");
        v.finish()?;

        Ok(Self {
            lat: dto.lat.unwrap_or_default(),
            lon: dto.lon.unwrap_or_default(),
            city,
            country,
        })
    }
}

/// Admin edits to an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserParam {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub is_verified: Option<bool>,
    pub temperature_unit: Option<String>,
    pub language: Option<String>,
}

impl UpdateUserParam {
    pub fn from_dto(dto: UpdateUserDto) -> Result<Self, ValidationError> {
        let email = dto.email.as_deref().map(normalize_email);

        let mut v = Validator::new();
        if let Some(full_name) = &dto.full_name {
            v.check(
                full_name.trim().chars().count() <= 100,
                "fullName",
                "Full name must be at most 100 characters",
            );
        }
        if let Some(email) = &email {
            v.check(is_valid_email(email), "email", "Please provide a valid email");
        }
        let preferences = dto.preferences.unwrap_or_default();
        UpdatePreferencesParam::check(&preferences, &mut v);
        v.finish()?;

        Ok(Self {
            full_name: non_blank(dto.full_name),
            email,
            is_verified: dto.is_verified,
            temperature_unit: preferences.temperature_unit,
            language: preferences.language,
        })
    }

    /// Names of the fields this update changes, as recorded in the audit log.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.full_name.is_some() {
            fields.push("fullName");
        }
        if self.email.is_some() {
            fields.push("email");
        }
        if self.is_verified.is_some() {
            fields.push("isVerified");
        }
        if self.temperature_unit.is_some() || self.language.is_some() {
            fields.push("preferences");
        }
        fields
    }
}

/// Page of users with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedUsers {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl PaginatedUsers {
    pub fn into_dto(self) -> UserListDto {
        UserListDto {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            users: self.users.into_iter().map(User::into_admin_dto).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_temperature_unit() {
        let err = UpdatePreferencesParam::from_dto(UpdatePreferencesDto {
            temperature_unit: Some("kelvin".to_string()),
            language: Some("vi".to_string()),
        })
        .unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "temperatureUnit");
    }

    #[test]
    fn lists_changed_fields_for_audit() {
        let param = UpdateUserParam::from_dto(UpdateUserDto {
            full_name: Some("Le Van C".to_string()),
            email: Some("C@Example.com".to_string()),
            is_verified: None,
            preferences: Some(UpdatePreferencesDto {
                temperature_unit: None,
                language: Some("vi".to_string()),
            }),
        })
        .unwrap();

        assert_eq!(param.email.as_deref(), Some("c@example.com"));
        assert_eq!(param.changed_fields(), vec!["fullName", "email", "preferences"]);
    }

    #[test]
    fn grants_admin_by_role_or_email() {
        let admin_emails = vec!["ops@example.com".to_string()];
        let mut user = User::from_entity(entity::user::Model {
            id: 1,
            username: "ops".to_string(),
            email: "OPS@example.com".to_string(),
            password_hash: String::new(),
            cccd: None,
            date_of_birth: None,
            gender: None,
            address: None,
            full_name: None,
            search_text: String::new(),
            phone_number: None,
            is_verified: false,
            banned: false,
            role: "user".to_string(),
            temperature_unit: "celsius".to_string(),
            language: "en".to_string(),
            last_lat: None,
            last_lon: None,
            last_city: None,
            last_country: None,
            last_location_at: None,
            discord_user_id: None,
            discord_channel_id: None,
            discord_subscribed: false,
            discord_notification_city: None,
            discord_notification_time: None,
            discord_last_notification: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });

        assert!(user.is_admin(&admin_emails));
        assert_eq!(user.clone().into_public_dto(&admin_emails).role, "admin");

        user.email = "someone@example.com".to_string();
        assert_eq!(user.clone().into_public_dto(&admin_emails).role, "user");
        assert!(!user.is_admin(&admin_emails));

        user.role = Role::Admin;
        assert!(user.is_admin(&[]));
    }
}
