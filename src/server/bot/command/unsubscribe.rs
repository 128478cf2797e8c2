use dioxus_logger::tracing;
use sea_orm::DatabaseConnection;

use super::Reply;
use crate::server::service::discord::DiscordService;

/// `/unsubscribe`: stops notifications for the app user linked to the invoker.
/// Every reply is ephemeral.
pub async fn run(db: &DatabaseConnection, discord_user_id: u64) -> Reply {
    match DiscordService::new(db)
        .unsubscribe_by_discord_id(&discord_user_id.to_string())
        .await
    {
        Ok(true) => Reply::private("✅ Successfully unsubscribed from weather notifications."),
        Ok(false) => Reply::private("You are not subscribed to weather notifications."),
        Err(e) => {
            tracing::error!("/unsubscribe failed for {}: {}", discord_user_id, e);
            Reply::error("Error unsubscribing from notifications.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::error::AppError;
    use test_utils::{builder::TestBuilder, factory::user::UserFactory};

    /// Tests unsubscribing a linked, subscribed user twice.
    ///
    /// Expected: success message, then the not-subscribed message
    #[tokio::test]
    async fn unsubscribes_linked_user() -> Result<(), AppError> {
        let test = TestBuilder::new().with_user_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        UserFactory::new(db)
            .discord("4242", "7")
            .subscribed("Hanoi", None)
            .build()
            .await?;

        let first = run(db, 4242).await;
        let second = run(db, 4242).await;

        assert!(first.ephemeral);
        assert!(first.content.unwrap().contains("Successfully unsubscribed"));
        assert_eq!(
            second.content.as_deref(),
            Some("You are not subscribed to weather notifications.")
        );

        Ok(())
    }
}
