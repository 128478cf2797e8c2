use super::*;

/// Tests listing audit rows.
///
/// Verifies that rows come back newest first with the stored action name.
///
/// Expected: two rows, latest first
#[tokio::test]
async fn lists_newest_first() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AdminAudit)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AdminAuditRepository::new(db);
    repo.create(audit(1, AuditAction::BanUser, 5)).await?;
    repo.create(audit(1, AuditAction::UnbanUser, 5)).await?;

    let page = repo.get_paginated(filter(None, None)).await?;

    assert_eq!(page.total, 2);
    assert_eq!(page.audits[0].action, "unban_user");
    assert_eq!(page.audits[1].action, "ban_user");

    Ok(())
}

/// Tests filtering by admin and action.
///
/// Expected: only matching rows counted
#[tokio::test]
async fn filters_by_admin_and_action() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::AdminAudit)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AdminAuditRepository::new(db);
    repo.create(audit(1, AuditAction::BanUser, 5)).await?;
    repo.create(audit(2, AuditAction::BanUser, 6)).await?;
    repo.create(audit(2, AuditAction::DeleteUser, 7)).await?;

    let by_admin = repo.get_paginated(filter(Some(2), None)).await?;
    assert_eq!(by_admin.total, 2);

    let by_action = repo.get_paginated(filter(None, Some("ban_user"))).await?;
    assert_eq!(by_action.total, 2);

    let both = repo.get_paginated(filter(Some(2), Some("delete_user"))).await?;
    assert_eq!(both.total, 1);
    assert_eq!(both.audits[0].target_user_id, Some(7));

    Ok(())
}
