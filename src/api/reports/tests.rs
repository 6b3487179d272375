use crate::db::types::ReportStatus;
use crate::test_support;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn student_submits_and_mentor_marks() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let mentor_token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/reports",
            Some(&student_token),
            Some(json!({
                "title": "Day 1",
                "tags": "db",
                "hours_worked": 5.5,
                "status": "draft",
                "content": "Set up the schema and seeded test data."
            })),
        ))
        .await
        .expect("create report");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["status"], "draft");
    assert_eq!(created["mark"], serde_json::Value::Null);
    let report_id = created["id"].as_str().expect("report id").to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/reports/{report_id}/mark"),
            Some(&mentor_token),
            Some(json!({"mark": 8})),
        ))
        .await
        .expect("mark report");

    let status = response.status();
    let marked = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {marked}");
    assert_eq!(marked["mark"], 8);
    assert_eq!(marked["status"], "reviewed");

    // The author sees the mark but cannot change it through edit
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/reports/{report_id}"),
            Some(&student_token),
            Some(json!({"title": "Day 1 (edited)", "mark": 20})),
        ))
        .await
        .expect("edit report");

    let status = response.status();
    let edited = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {edited}");
    assert_eq!(edited["title"], "Day 1 (edited)");
    assert_eq!(edited["mark"], 8);

    // Marking produced a notification for the author
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/notifications",
            Some(&student_token),
            None,
        ))
        .await
        .expect("notifications");

    let body = test_support::read_json(response).await;
    let messages: Vec<&str> =
        body.as_array().expect("array").iter().filter_map(|n| n["message"].as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("received mark 8")), "messages: {messages:?}");
}

#[tokio::test]
async fn outsiders_cannot_view_a_report() {
    let ctx = test_support::setup_test_context().await;

    let backend = test_support::insert_option(ctx.state.db(), "Backend").await;
    let frontend = test_support::insert_option(ctx.state.db(), "Frontend").await;
    let author = test_support::insert_student(ctx.state.db(), "ada", &backend.id).await;
    let other_student = test_support::insert_student(ctx.state.db(), "linus", &frontend.id).await;
    let other_mentor =
        test_support::insert_mentor(ctx.state.db(), "mentor", &frontend.id, "CSS").await;

    let report = test_support::insert_report(
        ctx.state.db(),
        &author.id,
        &backend.id,
        "Day 1",
        ReportStatus::Submitted,
    )
    .await;

    for outsider in [&other_student, &other_mentor] {
        let token = test_support::bearer_token(&outsider.id, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/reports/{}", report.id),
                Some(&token),
                None,
            ))
            .await
            .expect("get report");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
async fn mark_is_mentor_only_and_range_checked() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let report = test_support::insert_report(
        ctx.state.db(),
        &student.id,
        &option.id,
        "Day 1",
        ReportStatus::Submitted,
    )
    .await;

    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/reports/{}/mark", report.id),
            Some(&student_token),
            Some(json!({"mark": 10})),
        ))
        .await
        .expect("mark as student");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mentor_token = test_support::bearer_token(&mentor.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/reports/{}/mark", report.id),
            Some(&mentor_token),
            Some(json!({"mark": 25})),
        ))
        .await
        .expect("mark out of range");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_edits_and_deletes() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let report = test_support::insert_report(
        ctx.state.db(),
        &student.id,
        &option.id,
        "Day 1",
        ReportStatus::Draft,
    )
    .await;

    let mentor_token = test_support::bearer_token(&mentor.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/reports/{}", report.id),
            Some(&mentor_token),
            Some(json!({"title": "Hijacked"})),
        ))
        .await
        .expect("edit as mentor");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/reports/{}", report.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("delete report");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/reports/{}", report.id),
            Some(&student_token),
            None,
        ))
        .await
        .expect("get deleted report");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_scoped_by_role() {
    let ctx = test_support::setup_test_context().await;

    let backend = test_support::insert_option(ctx.state.db(), "Backend").await;
    let frontend = test_support::insert_option(ctx.state.db(), "Frontend").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &backend.id).await;
    let grace = test_support::insert_student(ctx.state.db(), "grace", &backend.id).await;
    let linus = test_support::insert_student(ctx.state.db(), "linus", &frontend.id).await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &backend.id, "Rust").await;

    test_support::insert_report(ctx.state.db(), &ada.id, &backend.id, "A1", ReportStatus::Draft)
        .await;
    test_support::insert_report(ctx.state.db(), &grace.id, &backend.id, "G1", ReportStatus::Draft)
        .await;
    test_support::insert_report(ctx.state.db(), &linus.id, &frontend.id, "L1", ReportStatus::Draft)
        .await;

    let ada_token = test_support::bearer_token(&ada.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/reports", Some(&ada_token), None))
        .await
        .expect("list as student");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("array").len(), 1);

    let mentor_token = test_support::bearer_token(&mentor.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/reports",
            Some(&mentor_token),
            None,
        ))
        .await
        .expect("list as mentor");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn sample_report_is_public() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/reports/sample", None, None))
        .await
        .expect("sample report");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["id"], "sample");
    assert!(body["summary"].as_str().unwrap_or("").split_whitespace().count() <= 10);
}
