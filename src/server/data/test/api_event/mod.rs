use crate::server::{data::api_event::ApiEventRepository, model::api_event::NewApiEventParam};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::api_event::ApiEventFactory};

mod aggregate;
mod create;
