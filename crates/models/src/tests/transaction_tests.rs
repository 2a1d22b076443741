use anyhow::Result;
use sea_orm::{EntityTrait, TransactionTrait};
use uuid::Uuid;

use super::setup_test_db;
use crate::student_profile::{self, ProfileFields};
use crate::user::{self, NewUser, Role};

/// A rolled-back completion leaves neither the profile nor the verification flag behind.
#[tokio::test]
async fn test_profile_completion_rollback() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, NewUser {
        email: format!("tx_{}@example.com", Uuid::new_v4().simple()),
        full_name: "Tx User".into(),
        role: Role::Student,
        student_id: String::new(),
        department: String::new(),
    })
    .await?;

    let txn = db.begin().await?;
    let fields = ProfileFields {
        student_id: Some(format!("T-{}", Uuid::new_v4().simple())),
        department: Some("ME".into()),
        ..Default::default()
    };
    student_profile::create(&txn, u.id, fields).await?;
    assert!(user::mark_verified(&txn, u.id).await?);
    txn.rollback().await?;

    assert!(student_profile::find_by_user(&db, u.id).await?.is_none());
    let reloaded = user::find_by_id(&db, u.id).await?;
    assert_eq!(reloaded.map(|u| u.is_verified), Some(false));

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_profile_completion_commit() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, NewUser {
        email: format!("txc_{}@example.com", Uuid::new_v4().simple()),
        full_name: "Tx Commit".into(),
        role: Role::Student,
        student_id: String::new(),
        department: String::new(),
    })
    .await?;

    let txn = db.begin().await?;
    student_profile::create(&txn, u.id, ProfileFields { department: Some("CE".into()), ..Default::default() }).await?;
    user::mark_verified(&txn, u.id).await?;
    txn.commit().await?;

    let p = student_profile::find_by_user(&db, u.id).await?;
    assert!(p.is_some_and(|p| p.student_id.is_none()));
    assert_eq!(user::find_by_id(&db, u.id).await?.map(|u| u.is_verified), Some(true));

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    Ok(())
}
