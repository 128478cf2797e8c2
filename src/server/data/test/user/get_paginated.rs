use super::*;
use chrono::{Duration, Utc};

fn filter(q: Option<&str>, status: Option<UserStatusFilter>, page: u64, per_page: u64) -> UserFilterParam {
    UserFilterParam {
        q: q.map(str::to_string),
        status,
        page,
        per_page,
    }
}

/// Tests pagination ordering.
///
/// Verifies that users are returned newest first with an accurate total.
///
/// Expected: second page holds the oldest users
#[tokio::test]
async fn pages_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let mut ids = Vec::new();
    for i in 0..5 {
        let user = UserFactory::new(db)
            .created_at(now - Duration::hours(i))
            .build()
            .await?;
        ids.push(user.id);
    }

    let repo = UserRepository::new(db);
    let first = repo.get_paginated(filter(None, None, 1, 2)).await?;
    let last = repo.get_paginated(filter(None, None, 3, 2)).await?;

    assert_eq!(first.total, 5);
    assert_eq!(first.users.len(), 2);
    assert_eq!(first.users[0].id, ids[0]);
    assert_eq!(last.users.len(), 1);
    assert_eq!(last.users[0].id, ids[4]);

    Ok(())
}

/// Tests case-insensitive text search.
///
/// Verifies that the query matches username, email and full name regardless
/// of case.
///
/// Expected: each matching user found once
#[tokio::test]
async fn searches_case_insensitively() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).username("HanoiFan").build().await?;
    UserFactory::new(db).email("someone@hanoi.vn").build().await?;
    UserFactory::new(db).full_name("Tran Thi B").build().await?;

    let repo = UserRepository::new(db);

    let by_name = repo.get_paginated(filter(Some("HANOI"), None, 1, 20)).await?;
    assert_eq!(by_name.total, 2);

    let by_full_name = repo.get_paginated(filter(Some("thi b"), None, 1, 20)).await?;
    assert_eq!(by_full_name.total, 1);

    Ok(())
}

/// Tests the ban status filter.
///
/// Expected: banned and active users separated
#[tokio::test]
async fn filters_by_status() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).banned(true).build().await?;
    UserFactory::new(db).build().await?;
    UserFactory::new(db).build().await?;

    let repo = UserRepository::new(db);

    let banned = repo
        .get_paginated(filter(None, Some(UserStatusFilter::Banned), 1, 20))
        .await?;
    let active = repo
        .get_paginated(filter(None, Some(UserStatusFilter::Active), 1, 20))
        .await?;

    assert_eq!(banned.total, 1);
    assert!(banned.users[0].banned);
    assert_eq!(active.total, 2);

    Ok(())
}

/// Tests search over Vietnamese names.
///
/// Verifies that accented capitals match their lowercase query, which SQLite's
/// ASCII-only `LOWER` would miss.
///
/// Expected: full and partial accented queries both find the user
#[tokio::test]
async fn searches_accented_names() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).full_name("NGUYỄN VĂN AN").build().await?;
    UserFactory::new(db).full_name("Tran Thi B").build().await?;

    let repo = UserRepository::new(db);

    for q in ["nguy", "nguyễn", "Văn an", "NGUYỄN VĂN"] {
        let result = repo.get_paginated(filter(Some(q), None, 1, 20)).await?;
        assert_eq!(result.total, 1, "query {q}");
    }

    Ok(())
}

/// Tests that LIKE wildcards in the query match literally.
///
/// Expected: `%` and `_` only match users containing those characters
#[tokio::test]
async fn treats_wildcards_literally() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    UserFactory::new(db).username("snake_case").build().await?;
    UserFactory::new(db).username("snakexcase").build().await?;
    UserFactory::new(db).username("fiftypercent").build().await?;

    let repo = UserRepository::new(db);

    let underscore = repo.get_paginated(filter(Some("e_c"), None, 1, 20)).await?;
    assert_eq!(underscore.total, 1);
    assert_eq!(underscore.users[0].username, "snake_case");

    let percent = repo.get_paginated(filter(Some("%"), None, 1, 20)).await?;
    assert_eq!(percent.total, 0);

    Ok(())
}

/// Tests that admin edits are searchable.
///
/// Expected: the new full name matches, the old one no longer does
#[tokio::test]
async fn searches_updated_full_name() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_user_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserFactory::new(db).full_name("Le Van C").build().await?;
    let repo = UserRepository::new(db);

    repo.update(
        user.id,
        UpdateUserParam {
            full_name: Some("Phạm Thị Đào".to_string()),
            ..Default::default()
        },
    )
    .await?;

    let new_name = repo.get_paginated(filter(Some("phạm thị"), None, 1, 20)).await?;
    let old_name = repo.get_paginated(filter(Some("le van"), None, 1, 20)).await?;

    assert_eq!(new_name.total, 1);
    assert_eq!(old_name.total, 0);

    Ok(())
}
