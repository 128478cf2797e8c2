use super::*;
use crate::server::model::admin::{Bucket, MetricPoint};
use chrono::TimeZone;

/// Tests ranking search queries.
///
/// Verifies that only search events inside the window are counted and that
/// results are ordered by frequency and truncated.
///
/// Expected: [("hanoi", 3), ("hue", 2)]
#[tokio::test]
async fn ranks_top_search_queries() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ApiEvent)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..3 {
        ApiEventFactory::new(db).action("search").query("hanoi").build().await?;
    }
    for _ in 0..2 {
        ApiEventFactory::new(db).action("search").query("hue").build().await?;
    }
    ApiEventFactory::new(db).action("search").query("sapa").build().await?;
    ApiEventFactory::new(db)
        .action("search")
        .query("hanoi")
        .ts(Utc::now() - Duration::days(3))
        .build()
        .await?;
    ApiEventFactory::new(db).action("weather_current").query("hanoi").build().await?;

    let repo = ApiEventRepository::new(db);
    let top = repo
        .top_search_queries_since(Utc::now() - Duration::hours(1), 2)
        .await?;

    assert_eq!(
        top,
        vec![("hanoi".to_string(), 3), ("hue".to_string(), 2)]
    );

    Ok(())
}

/// Tests grouping events into time buckets in the database.
///
/// Verifies that events outside the window and other actions are excluded and
/// that buckets come back labelled and ascending.
///
/// Expected: two daily buckets, then two hourly buckets in the same day
#[tokio::test]
async fn counts_events_per_bucket() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ApiEvent)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let at = |d: u32, h: u32, m: u32| Utc.with_ymd_and_hms(2025, 3, d, h, m, 0).unwrap();
    ApiEventFactory::new(db).action("search").ts(at(2, 10, 15)).build().await?;
    ApiEventFactory::new(db).action("search").ts(at(2, 10, 45)).build().await?;
    ApiEventFactory::new(db).action("search").ts(at(2, 11, 5)).build().await?;
    ApiEventFactory::new(db).action("search").ts(at(1, 23, 59)).build().await?;
    ApiEventFactory::new(db).action("auth_login").ts(at(2, 10, 30)).build().await?;
    ApiEventFactory::new(db).action("search").ts(at(1, 8, 0) - Duration::days(5)).build().await?;

    let repo = ApiEventRepository::new(db);
    let since = at(1, 0, 0);

    let daily = repo
        .bucketed_counts_since(since, Some("search"), Bucket::Day)
        .await?;
    assert_eq!(
        daily,
        vec![
            MetricPoint {
                bucket: "2025-03-01".to_string(),
                count: 1
            },
            MetricPoint {
                bucket: "2025-03-02".to_string(),
                count: 3
            },
        ]
    );

    let hourly = repo.bucketed_counts_since(since, None, Bucket::Hour).await?;
    let labels: Vec<(&str, u64)> = hourly.iter().map(|p| (p.bucket.as_str(), p.count)).collect();
    assert_eq!(
        labels,
        vec![
            ("2025-03-01T23:00:00", 1),
            ("2025-03-02T10:00:00", 3),
            ("2025-03-02T11:00:00", 1),
        ]
    );

    Ok(())
}

/// Tests the per-user action breakdown.
///
/// Expected: counts per action for that user only, most frequent first
#[tokio::test]
async fn breaks_down_actions_for_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::ApiEvent)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..2 {
        ApiEventFactory::new(db).user_id(1).action("search").build().await?;
    }
    ApiEventFactory::new(db).user_id(1).action("add_favorite").build().await?;
    ApiEventFactory::new(db).user_id(2).action("search").build().await?;

    let repo = ApiEventRepository::new(db);
    let breakdown = repo
        .action_breakdown_for_user(1, Utc::now() - Duration::days(30))
        .await?;

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].action.as_deref(), Some("search"));
    assert_eq!(breakdown[0].count, 2);
    assert_eq!(breakdown[1].action.as_deref(), Some("add_favorite"));
    assert_eq!(breakdown[1].count, 1);

    Ok(())
}
