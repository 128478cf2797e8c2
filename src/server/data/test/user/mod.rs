use crate::server::{
    data::user::UserRepository,
    model::{
        discord::{ConnectDiscordParam, SubscribeParam},
        user::{CreateUserParam, UpdateUserParam, UserFilterParam, UserStatusFilter},
    },
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::user::UserFactory};

mod create;
mod delete;
mod discord_link;
mod get_paginated;
mod get_subscribed;
mod identity_taken;
mod signups;
mod update;

fn create_param(username: &str, email: &str) -> CreateUserParam {
    CreateUserParam {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        cccd: None,
        full_name: None,
        date_of_birth: None,
        gender: None,
        address: None,
    }
}
