//! Database repository layer for all domain entities.
//!
//! This module contains repository structs that handle database operations (CRUD) for each
//! domain in the application. Repositories use SeaORM entity models internally and return
//! domain models to keep the data layer separate from business logic.

pub mod admin_audit;
pub mod api_event;
pub mod favorite_city;
pub mod search_history;
pub mod user;

#[cfg(test)]
mod test;
