use super::*;

/// Tests the connect, subscribe and unsubscribe sequence.
///
/// Verifies that connecting stores the link unsubscribed, subscribing sets the
/// city and time, and unsubscribing clears them again.
///
/// Expected: subscribed toggles with the city set then cleared
#[tokio::test]
async fn toggles_subscription() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).build().await?;
    let repo = UserRepository::new(db);

    let connected = repo
        .set_discord_link(
            user.id,
            ConnectDiscordParam {
                discord_user_id: "111".to_string(),
                channel_id: "222".to_string(),
            },
        )
        .await?
        .unwrap();
    assert!(connected.discord.is_connected());
    assert!(!connected.discord.subscribed);

    let subscribed = repo
        .subscribe(
            user.id,
            SubscribeParam {
                city: "Hanoi".to_string(),
                notification_time: Some("07:30".to_string()),
            },
        )
        .await?
        .unwrap();
    assert!(subscribed.discord.subscribed);
    assert_eq!(subscribed.discord.notification_city.as_deref(), Some("Hanoi"));
    assert_eq!(subscribed.discord.notification_time.as_deref(), Some("07:30"));

    let unsubscribed = repo.unsubscribe(user.id).await?.unwrap();
    assert!(!unsubscribed.discord.subscribed);
    assert!(unsubscribed.discord.notification_city.is_none());
    assert!(unsubscribed.discord.is_connected());

    let by_discord = repo.find_by_discord_user_id("111").await?;
    assert_eq!(by_discord.map(|u| u.id), Some(user.id));

    Ok(())
}

/// Tests changing the notification city without a new time.
///
/// Expected: city changed, existing time kept
#[tokio::test]
async fn keeps_time_when_updating_city() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db)
        .discord("111", "222")
        .subscribed("Hanoi", Some("06:00"))
        .build()
        .await?;
    let repo = UserRepository::new(db);

    let updated = repo
        .update_notification_city(user.id, "Da Nang".to_string(), None)
        .await?
        .unwrap();

    assert_eq!(updated.discord.notification_city.as_deref(), Some("Da Nang"));
    assert_eq!(updated.discord.notification_time.as_deref(), Some("06:00"));

    Ok(())
}
