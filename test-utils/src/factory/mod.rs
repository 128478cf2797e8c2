//! Factory methods for creating test data.
//!
//! Each entity has its own factory module, either with a `Factory` struct for
//! customization or a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let user = factory::create_user(&db).await?;
//!     let favorite = factory::create_favorite(&db, user.id, "Hanoi", "VN").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create user entities (plain, admin, banned, Discord-linked)
//! - `favorite_city` - Create favorite city rows
//! - `search_history` - Create search history rows
//! - `api_event` - Create telemetry events
//! - `helpers` - Unique ids and multi-entity helpers

pub mod api_event;
pub mod favorite_city;
pub mod helpers;
pub mod search_history;
pub mod user;

pub use api_event::create_event;
pub use favorite_city::create_favorite;
pub use search_history::{create_search_entry, create_search_entry_at};
pub use user::{create_admin, create_user};
