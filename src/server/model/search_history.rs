use chrono::{DateTime, Utc};

use crate::{
    model::user::{AddSearchHistoryDto, SearchHistoryEntryDto},
    server::error::validation::{ValidationError, Validator},
};

/// Most entries kept per user; older ones are pruned on insert.
pub const SEARCH_HISTORY_LIMIT: u64 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub id: i32,
    pub city: String,
    pub country: String,
    pub searched_at: DateTime<Utc>,
}

impl SearchEntry {
    pub fn from_entity(entity: entity::search_history::Model) -> Self {
        Self {
            id: entity.id,
            city: entity.city,
            country: entity.country,
            searched_at: entity.searched_at,
        }
    }

    pub fn into_dto(self) -> SearchHistoryEntryDto {
        SearchHistoryEntryDto {
            id: self.id,
            city: self.city,
            country: self.country,
            searched_at: self.searched_at,
        }
    }
}

/// Validated search history entry.
#[derive(Debug, Clone)]
pub struct AddSearchParam {
    pub city: String,
    pub country: String,
}

impl AddSearchParam {
    pub fn from_dto(dto: AddSearchHistoryDto) -> Result<Self, ValidationError> {
        let city = dto.city.trim().to_string();
        let country = dto.country.trim().to_string();

        let mut v = Validator::new();
        v.check(!city.is_empty(), "city", "City name is required");
        v.check(!country.is_empty(), "country", "Country is required");
        v.finish()?;

        Ok(Self { city, country })
    }
}
