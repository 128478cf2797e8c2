pub use super::admin_audit::Entity as AdminAudit;
pub use super::api_event::Entity as ApiEvent;
pub use super::favorite_city::Entity as FavoriteCity;
pub use super::search_history::Entity as SearchHistory;
pub use super::user::Entity as User;
