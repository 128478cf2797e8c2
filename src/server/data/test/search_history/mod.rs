use crate::server::{
    data::search_history::SearchHistoryRepository, model::search_history::SEARCH_HISTORY_LIMIT,
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod clear;
mod push;
