//! Usage telemetry parameters.

use serde_json::Value;

use crate::model::admin::ActionCountDto;

/// A request to record in the `apievents` table.
#[derive(Debug, Clone, Default)]
pub struct NewApiEventParam {
    /// Event family; `request` for middleware-recorded calls.
    pub event_type: String,
    pub user_id: Option<i32>,
    /// Derived action name such as `search` or `add_favorite`.
    pub action: Option<String>,
    /// Search text for `search` actions.
    pub query: Option<String>,
    pub meta: Option<Value>,
    pub ip: Option<String>,
}

/// Count of events for one action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCount {
    pub action: Option<String>,
    pub count: u64,
}

impl ActionCount {
    pub fn into_dto(self) -> ActionCountDto {
        ActionCountDto {
            action: self.action,
            count: self.count,
        }
    }
}
