use crate::server::{
    data::favorite_city::FavoriteCityRepository,
    model::favorite::{AddFavoriteOutcome, AddFavoriteParam},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod add;
mod remove;

fn hanoi() -> AddFavoriteParam {
    AddFavoriteParam {
        name: "Hanoi".to_string(),
        country: "VN".to_string(),
        lat: 21.0285,
        lon: 105.8542,
    }
}
