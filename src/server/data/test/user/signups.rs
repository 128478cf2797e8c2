use super::*;
use crate::server::model::admin::{Bucket, MetricPoint};
use chrono::{TimeZone, Utc};

/// Tests counting signups per day in the database.
///
/// Verifies that accounts created before the window are excluded and that
/// the remaining signups are grouped by creation day.
///
/// Expected: [2025-03-01: 2, 2025-03-03: 1]
#[tokio::test]
async fn counts_signups_per_day() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_user_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2025, 3, d, h, 0, 0).unwrap();
    UserFactory::new(db).created_at(at(1, 8)).build().await?;
    UserFactory::new(db).created_at(at(1, 22)).build().await?;
    UserFactory::new(db).created_at(at(3, 12)).build().await?;
    UserFactory::new(db)
        .created_at(Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap())
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let points = repo.bucketed_signups_since(at(1, 0), Bucket::Day).await?;

    assert_eq!(
        points,
        vec![
            MetricPoint {
                bucket: "2025-03-01".to_string(),
                count: 2
            },
            MetricPoint {
                bucket: "2025-03-03".to_string(),
                count: 1
            },
        ]
    );

    Ok(())
}
