use super::*;

/// Tests recording an event.
///
/// Expected: event counted and attributed to the user
#[tokio::test]
async fn records_event() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ApiEvent)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ApiEventRepository::new(db);
    repo.create(NewApiEventParam {
        event_type: "request".to_string(),
        user_id: Some(7),
        action: Some("search".to_string()),
        query: Some("hanoi".to_string()),
        meta: Some(serde_json::json!({ "method": "GET" })),
        ip: Some("127.0.0.1".to_string()),
    })
    .await?;

    assert_eq!(repo.count().await?, 1);
    assert_eq!(
        repo.count_for_user_since(7, Utc::now() - Duration::minutes(1))
            .await?,
        1
    );

    Ok(())
}
