//! API event factory for telemetry-driven tests.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating API events with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let event = ApiEventFactory::new(&db)
///     .action("search")
///     .query("hanoi")
///     .build()
///     .await?;
/// ```
pub struct ApiEventFactory<'a> {
    db: &'a DatabaseConnection,
    event_type: String,
    user_id: Option<i32>,
    action: Option<String>,
    query: Option<String>,
    ts: DateTime<Utc>,
}

impl<'a> ApiEventFactory<'a> {
    /// Creates a factory for a `request` event stamped now with no action.
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            event_type: "request".to_string(),
            user_id: None,
            action: None,
            query: None,
            ts: Utc::now(),
        }
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn ts(mut self, ts: DateTime<Utc>) -> Self {
        self.ts = ts;
        self
    }

    /// Builds and inserts the event into the database.
    pub async fn build(self) -> Result<entity::api_event::Model, DbErr> {
        entity::api_event::ActiveModel {
            event_type: ActiveValue::Set(self.event_type),
            user_id: ActiveValue::Set(self.user_id),
            action: ActiveValue::Set(self.action),
            query: ActiveValue::Set(self.query),
            meta: ActiveValue::Set(None),
            ip: ActiveValue::Set(None),
            ts: ActiveValue::Set(self.ts),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a `request` event with the given action, stamped now.
pub async fn create_event(
    db: &DatabaseConnection,
    action: &str,
) -> Result<entity::api_event::Model, DbErr> {
    ApiEventFactory::new(db).action(action).build().await
}
