mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use support::{app, get, json_request, register, send};

fn application(student_id: &str, slip: &str) -> Value {
    json!({
        "full_name": "Applicant",
        "student_id": student_id,
        "department": "CSE",
        "session": "2021-22",
        "dob": "2003-04-05",
        "gender": "Male",
        "mobile": "01700000000",
        "email": "applicant@example.com",
        "address": "Dhaka",
        "payment_slip_no": slip,
    })
}

#[tokio::test]
async fn applications_are_public_to_submit_and_admin_to_review() -> anyhow::Result<()> {
    let app = app();
    let (admin, _) = register(&app, "warden@example.com", "admin").await?;
    let (student, _) = register(&app, "pupil@example.com", "student").await?;

    let reply = send(&app, json_request("POST", "/applications", None, application("A-1", "SLIP-1"))?).await?;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    assert_eq!(reply.body["status"], "Pending");
    let id = reply.body["id"].as_str().unwrap_or_default().to_string();

    let reply = send(&app, json_request("POST", "/applications", None, application("A-1", "SLIP-2"))?).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["student_id"].is_array());
    let reply = send(&app, json_request("POST", "/applications", None, application("A-2", "SLIP-1"))?).await?;
    assert!(reply.body["payment_slip_no"].is_array());

    assert_eq!(send(&app, get("/applications", None)?).await?.status, StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, get("/applications", Some(&student))?).await?.status, StatusCode::FORBIDDEN);

    let reply = send(&app, get("/applications", Some(&admin))?).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_array().map(Vec::len), Some(1));

    let reply = send(&app, get(&format!("/applications/{id}"), Some(&admin))?).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["payment_slip_no"], "SLIP-1");
    Ok(())
}

#[tokio::test]
async fn application_status_transitions() -> anyhow::Result<()> {
    let app = app();
    let (admin, _) = register(&app, "warden2@example.com", "admin").await?;
    let reply = send(&app, json_request("POST", "/applications", None, application("B-1", "SLIP-B"))?).await?;
    let id = reply.body["id"].as_str().unwrap_or_default().to_string();
    let uri = format!("/applications/{id}/status");

    let reply = send(&app, json_request("PATCH", &uri, Some(&admin), json!({"status": "Pending"}))?).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, json!({"error": "Invalid status"}));

    let reply = send(&app, json_request("PATCH", &uri, Some(&admin), json!({}))?).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let reply = send(&app, json_request("PATCH", &uri, Some(&admin), json!({"status": "Approved"}))?).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "Approved");

    let missing = format!("/applications/{}/status", Uuid::new_v4());
    let reply = send(&app, json_request("PATCH", &missing, Some(&admin), json!({"status": "Approved"}))?).await?;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body, json!({"error": "Application not found"}));
    Ok(())
}

#[tokio::test]
async fn notice_writes_require_admin() -> anyhow::Result<()> {
    let app = app();
    let (student, _) = register(&app, "reader@example.com", "student").await?;
    let body = json!({"title": "Water supply", "body": "Off on Friday"});

    assert_eq!(send(&app, json_request("POST", "/notices", None, body.clone())?).await?.status, StatusCode::UNAUTHORIZED);
    let reply = send(&app, json_request("POST", "/notices", Some(&student), body)?).await?;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);
    assert_eq!(reply.body, json!({"error": "You do not have permission to perform this action."}));
    Ok(())
}

#[tokio::test]
async fn notice_crud_and_ordering() -> anyhow::Result<()> {
    let app = app();
    let (admin, _) = register(&app, "editor@example.com", "admin").await?;

    let mut ids = Vec::new();
    for (title, pinned) in [("B", true), ("A", false), ("C", false)] {
        let body = json!({"title": title, "body": "text", "pinned": pinned});
        let reply = send(&app, json_request("POST", "/notices", Some(&admin), body)?).await?;
        assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
        assert_eq!(reply.body["category"], "General");
        assert_eq!(reply.body["author"], "Admin");
        ids.push(reply.body["id"].as_str().unwrap_or_default().to_string());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let reply = send(&app, get("/notices", None)?).await?;
    let titles: Vec<&str> = reply
        .body
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, ["B", "C", "A"]);

    let a = format!("/notices/{}", ids[1]);
    let reply = send(&app, json_request("PATCH", &a, Some(&admin), json!({"pinned": true}))?).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["title"], "A");
    assert_eq!(reply.body["pinned"], true);

    let reply = send(&app, json_request("PUT", &a, Some(&admin), json!({"pinned": false}))?).await?;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["title"].is_array());

    let reply = send(&app, json_request("PUT", &a, Some(&admin), json!({"title": "A2", "body": "new", "category": "Exam"}))?).await?;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["category"], "Exam");

    let req = Request::builder()
        .method("DELETE")
        .uri(&a)
        .header("authorization", format!("Bearer {admin}"))
        .body(Body::empty())?;
    assert_eq!(send(&app, req).await?.status, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, get(&a, None)?).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(send(&app, get("/notices/not-a-uuid", None)?).await?.status, StatusCode::NOT_FOUND);
    Ok(())
}
