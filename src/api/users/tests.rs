use crate::db::types::ReportStatus;
use crate::repositories;
use crate::test_support;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn profile_returns_report_counts() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    test_support::insert_report(ctx.state.db(), &student.id, &option.id, "Day 1", ReportStatus::Draft)
        .await;
    test_support::insert_report(
        ctx.state.db(),
        &student.id,
        &option.id,
        "Day 2",
        ReportStatus::Submitted,
    )
    .await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/users/me/profile",
            Some(&token),
            None,
        ))
        .await
        .expect("profile");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["reports_count"], 2);
    assert_eq!(body["projects_count"], 0);
    assert_eq!(body["option"], "Backend");
}

#[tokio::test]
async fn update_profile_changes_fields_but_not_role() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/users/me/profile",
            Some(&token),
            Some(json!({"bio": "Compilers and coffee", "skills": "rust, sql"})),
        ))
        .await
        .expect("update profile");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["bio"], "Compilers and coffee");
    assert_eq!(body["skills"], "rust, sql");
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn update_profile_rejects_taken_username() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    test_support::insert_student(ctx.state.db(), "existing", &option.id).await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/users/me/profile",
            Some(&token),
            Some(json!({"username": "existing"})),
        ))
        .await
        .expect("update profile");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn classmates_excludes_self_and_other_options() {
    let ctx = test_support::setup_test_context().await;

    let backend = test_support::insert_option(ctx.state.db(), "Backend").await;
    let frontend = test_support::insert_option(ctx.state.db(), "Frontend").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &backend.id).await;
    test_support::insert_student(ctx.state.db(), "grace", &backend.id).await;
    test_support::insert_student(ctx.state.db(), "linus", &frontend.id).await;

    let token = test_support::bearer_token(&ada.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/users/classmates",
            Some(&token),
            None,
        ))
        .await
        .expect("classmates");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let classmates = body.as_array().expect("array");
    assert_eq!(classmates.len(), 1);
    assert_eq!(classmates[0]["username"], "grace");
    assert_eq!(classmates[0]["name_abbreviation"], "TU");
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_data() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let report = test_support::insert_report(
        ctx.state.db(),
        &student.id,
        &option.id,
        "Day 1",
        ReportStatus::Draft,
    )
    .await;
    let course = test_support::insert_course(ctx.state.db(), &option.id, "Rust 101", 1).await;
    repositories::progress::mark_completed(
        ctx.state.db(),
        &student.id,
        &course.id,
        crate::core::time::primitive_now_utc(),
    )
    .await
    .expect("progress");

    let deleted = repositories::users::delete(ctx.state.db(), &student.id).await.expect("delete");
    assert!(deleted);

    assert!(repositories::reports::find_by_id(ctx.state.db(), &report.id)
        .await
        .expect("report query")
        .is_none());
    assert!(repositories::profiles::find_student_for_user(ctx.state.db(), &student.id)
        .await
        .expect("profile query")
        .is_none());
    assert!(repositories::progress::find_for_student_course(ctx.state.db(), &student.id, &course.id)
        .await
        .expect("progress query")
        .is_none());
}
