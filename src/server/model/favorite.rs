//! Favorite city domain model.

use chrono::{DateTime, Utc};

use crate::{
    model::user::{AddFavoriteDto, FavoriteCityDto},
    server::error::validation::{ValidationError, Validator},
};

#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteCity {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub added_at: DateTime<Utc>,
}

impl FavoriteCity {
    pub fn from_entity(entity: entity::favorite_city::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            country: entity.country,
            lat: entity.lat,
            lon: entity.lon,
            added_at: entity.added_at,
        }
    }

    pub fn into_dto(self) -> FavoriteCityDto {
        FavoriteCityDto {
            id: self.id,
            name: self.name,
            country: self.country,
            lat: self.lat,
            lon: self.lon,
            added_at: self.added_at,
        }
    }
}

/// Parameters for adding a favorite. `(name, country)` identifies the city.
#[derive(Debug, Clone)]
pub struct AddFavoriteParam {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl AddFavoriteParam {
    pub fn from_dto(dto: AddFavoriteDto) -> Result<Self, ValidationError> {
        let name = dto.name.trim().to_string();
        let country = dto.country.trim().to_string();

        let mut v = Validator::new();
        v.check(!name.is_empty(), "name", "City name is required");
        v.check(!country.is_empty(), "country", "Country is required");
        v.check(dto.lat.is_some(), "lat", "Latitude must be a number");
        v.check(dto.lon.is_some(), "lon", "Longitude must be a number");
        v.finish()?;

        Ok(Self {
            name,
            country,
            lat: dto.lat.unwrap_or_default(),
            lon: dto.lon.unwrap_or_default(),
        })
    }
}

/// Result of adding a favorite.
#[derive(Debug, Clone, PartialEq)]
pub enum AddFavoriteOutcome {
    /// The city was inserted; carries the updated list.
    Added(Vec<FavoriteCity>),
    /// The `(name, country)` pair was already present; carries the unchanged list.
    AlreadyPresent(Vec<FavoriteCity>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_every_favorite_field() {
        let err = AddFavoriteParam::from_dto(AddFavoriteDto {
            name: " ".to_string(),
            ..Default::default()
        })
        .unwrap_err();

        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "country", "lat", "lon"]);
    }
}
