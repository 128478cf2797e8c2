//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user along with one favorite city and one search history entry.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((user, favorite, history))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_user_with_activity(
    db: &DatabaseConnection,
) -> Result<
    (
        entity::user::Model,
        entity::favorite_city::Model,
        entity::search_history::Model,
    ),
    DbErr,
> {
    let user = crate::factory::user::create_user(db).await?;
    let favorite =
        crate::factory::favorite_city::create_favorite(db, user.id, "Hanoi", "VN").await?;
    let history =
        crate::factory::search_history::create_search_entry(db, user.id, "Hanoi", "VN").await?;

    Ok((user, favorite, history))
}
