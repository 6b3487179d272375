use crate::repositories;
use crate::repositories::work_items::WorkItemKind;
use crate::test_support;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn task_creation_assigns_students_and_notifies() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let grace = test_support::insert_student(ctx.state.db(), "grace", &option.id).await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/mentor/tasks",
            Some(&token),
            Some(json!({
                "name": "Build the API client",
                "content": "Use the generated schema.",
                "student_ids": [ada.id, grace.id]
            })),
        ))
        .await
        .expect("create task");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["student_ids"].as_array().expect("array").len(), 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/mentor/tasks", Some(&token), None))
        .await
        .expect("list tasks");
    let body = test_support::read_json(response).await;
    let tasks = body.as_array().expect("array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["student_ids"].as_array().expect("array").len(), 2);

    let ada_token = test_support::bearer_token(&ada.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/notifications",
            Some(&ada_token),
            None,
        ))
        .await
        .expect("notifications");
    let body = test_support::read_json(response).await;
    let messages: Vec<&str> =
        body.as_array().expect("array").iter().filter_map(|n| n["message"].as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("New task assigned")), "messages: {messages:?}");
}

#[tokio::test]
async fn task_due_date_survives_the_round_trip() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/mentor/tasks",
            Some(&token),
            Some(json!({
                "name": "Ship the release",
                "content": "Cut the tag on Friday.",
                "due_date": "2026-09-01T12:00:00Z",
                "student_ids": [ada.id]
            })),
        ))
        .await
        .expect("create task");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["due_date"], "2026-09-01T12:00:00Z");

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/mentor/tasks", Some(&token), None))
        .await
        .expect("list tasks");
    let body = test_support::read_json(response).await;
    assert_eq!(body.as_array().expect("array")[0]["due_date"], "2026-09-01T12:00:00Z");
}

#[tokio::test]
async fn empty_student_selection_is_rejected() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/mentor/tasks",
            Some(&token),
            Some(json!({"name": "Orphan task", "content": "", "student_ids": []})),
        ))
        .await
        .expect("create task");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assignment_outside_option_commits_nothing() {
    let ctx = test_support::setup_test_context().await;

    let backend = test_support::insert_option(ctx.state.db(), "Backend").await;
    let frontend = test_support::insert_option(ctx.state.db(), "Frontend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &backend.id, "Rust").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &backend.id).await;
    let linus = test_support::insert_student(ctx.state.db(), "linus", &frontend.id).await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/mentor/tasks",
            Some(&token),
            Some(json!({
                "name": "Mixed cohort task",
                "content": "",
                "student_ids": [ada.id, linus.id]
            })),
        ))
        .await
        .expect("create task");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "response: {body}");

    let tasks = repositories::work_items::list_for_mentor(ctx.state.db(), WorkItemKind::Task, &mentor.id)
        .await
        .expect("list tasks");
    assert!(tasks.is_empty(), "rolled-back task leaked into the table");
}

#[tokio::test]
async fn projects_share_the_assignment_contract() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let ada = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/mentor/projects",
            Some(&token),
            Some(json!({
                "name": "Capstone",
                "content": "Final project.",
                "student_ids": [ada.id]
            })),
        ))
        .await
        .expect("create project");

    assert_eq!(response.status(), StatusCode::CREATED);

    // The assignee sees the project on their dashboard
    let ada_token = test_support::bearer_token(&ada.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/dashboard", Some(&ada_token), None))
        .await
        .expect("student dashboard");
    let body = test_support::read_json(response).await;
    assert_eq!(body["projects_count"], 1);
}

#[tokio::test]
async fn mentor_dashboard_lists_option_students() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    test_support::insert_student(ctx.state.db(), "grace", &option.id).await;
    let token = test_support::bearer_token(&mentor.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/mentor/dashboard",
            Some(&token),
            None,
        ))
        .await
        .expect("mentor dashboard");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["option"], "Backend");
    assert_eq!(body["students"].as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn students_cannot_use_mentor_routes() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/v1/mentor/dashboard",
            Some(&token),
            None,
        ))
        .await
        .expect("mentor dashboard as student");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
