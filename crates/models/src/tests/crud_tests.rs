use anyhow::Result;
use sea_orm::EntityTrait;
use serde_json::json;
use uuid::Uuid;

use super::setup_test_db;
use crate::application::{self, ApplicationFields, ApplicationStatus};
use crate::fields::Mode;
use crate::notice::{self, NoticeFields};
use crate::student_profile::{self, ProfileFields};
use crate::user::{self, NewUser, Role};
use crate::user_credentials;

fn unique_email() -> String {
    format!("Crud_{}@Example.com", Uuid::new_v4().simple())
}

#[tokio::test]
async fn test_user_create_and_case_insensitive_lookup() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = unique_email();
    let created = user::create(&db, NewUser {
        email: email.clone(),
        full_name: "Crud User".into(),
        role: Role::Student,
        student_id: String::new(),
        department: String::new(),
    })
    .await?;
    assert_eq!(created.email, email.to_lowercase());
    assert_eq!(created.username, created.email);
    assert!(!created.is_verified);

    let found = user::find_by_email(&db, &email.to_uppercase()).await?;
    assert_eq!(found.map(|u| u.id), Some(created.id));

    // duplicate email surfaces as a unique conflict
    let dup = user::create(&db, NewUser {
        email: email.to_uppercase(),
        full_name: "Again".into(),
        role: Role::Student,
        student_id: String::new(),
        department: String::new(),
    })
    .await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Conflict(_))));

    user_credentials::create_password(&db, created.id, "hash-1".into(), user_credentials::ARGON2).await?;
    let second = user_credentials::create_password(&db, created.id, "hash-2".into(), user_credentials::ARGON2).await;
    assert!(matches!(second, Err(crate::errors::ModelError::Conflict(_))));
    let cred = user_credentials::find_by_user(&db, created.id).await?;
    assert_eq!(cred.map(|c| c.password_hash), Some("hash-1".to_string()));

    assert!(user::mark_verified(&db, created.id).await?);
    assert!(!user::mark_verified(&db, created.id).await?);

    user::Entity::delete_by_id(created.id).exec(&db).await?;
    assert!(user_credentials::find_by_user(&db, created.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_profile_create_and_patch() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let u = user::create(&db, NewUser {
        email: unique_email(),
        full_name: "Profile User".into(),
        role: Role::Student,
        student_id: String::new(),
        department: String::new(),
    })
    .await?;
    let sid = format!("S-{}", Uuid::new_v4().simple());
    let payload = json!({"student_id": sid, "department": "EEE", "room_no": 0});
    let fields = ProfileFields::from_payload(payload.as_object().unwrap(), Mode::Create).unwrap();
    let p = student_profile::create(&db, u.id, fields).await?;
    assert_eq!(p.room_no, 0);
    assert_eq!(p.student_id.as_deref(), Some(sid.as_str()));

    let patch = ProfileFields { session: Some("2021-22".into()), ..Default::default() };
    let p = student_profile::patch(&db, p, patch).await?;
    assert_eq!(p.session, "2021-22");
    assert_eq!(p.department, "EEE");

    assert!(student_profile::find_by_student_id(&db, &sid).await?.is_some());

    // cascade removes the profile with the user
    user::Entity::delete_by_id(u.id).exec(&db).await?;
    assert!(student_profile::find_by_user(&db, u.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_application_status_and_uniqueness() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let sid = format!("A-{}", Uuid::new_v4().simple());
    let slip = format!("PS-{}", Uuid::new_v4().simple());
    let payload = json!({
        "full_name": "Karim", "student_id": sid, "department": "CSE", "session": "2020-21",
        "dob": "2001-03-04", "gender": "Male", "mobile": "0171", "email": "karim@example.com",
        "address": "Sylhet", "payment_slip_no": slip
    });
    let fields = ApplicationFields::from_payload(payload.as_object().unwrap()).unwrap();
    let a = application::create(&db, fields.clone()).await?;
    assert_eq!(a.status, "Pending");
    assert!(application::exists_with_student_id(&db, &sid).await?);
    assert!(application::exists_with_payment_slip(&db, &slip).await?);

    let again = application::create(&db, fields).await;
    assert!(matches!(again, Err(ref e) if e.conflicts_on("student_id") || e.conflicts_on("payment_slip_no")));

    let a = application::set_status(&db, a, ApplicationStatus::Approved).await?;
    assert_eq!(a.status, "Approved");

    application::Entity::delete_by_id(a.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_notice_crud() -> Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let payload = json!({"title": "Exam routine", "body": "See attachment", "category": "Exam", "pinned": true});
    let fields = NoticeFields::from_payload(payload.as_object().unwrap(), Mode::Create).unwrap();
    let n = notice::create(&db, fields).await?;
    assert_eq!(n.author, "Admin");

    let n = notice::update(&db, n, NoticeFields { pinned: Some(false), ..Default::default() }).await?;
    assert!(!n.pinned);
    assert_eq!(n.title, "Exam routine");

    let listed = notice::list(&db).await?;
    assert!(listed.iter().any(|x| x.id == n.id));

    assert!(notice::delete(&db, n.id).await?);
    assert!(!notice::delete(&db, n.id).await?);
    assert!(notice::find_by_id(&db, n.id).await?.is_none());
    Ok(())
}
