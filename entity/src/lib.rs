//! SeaORM entities for the weather application schema.

pub mod prelude;

pub mod admin_audit;
pub mod api_event;
pub mod favorite_city;
pub mod search_history;
pub mod user;
