use crate::repositories;
use crate::test_support;
use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn listing_is_ordered_and_tracks_next_course() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    // Inserted out of order on purpose
    let second = test_support::insert_course(ctx.state.db(), &option.id, "SQL", 2).await;
    let first = test_support::insert_course(ctx.state.db(), &option.id, "Rust 101", 1).await;
    test_support::insert_course(ctx.state.db(), &option.id, "Async", 3).await;

    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/complete", first.id),
            Some(&token),
            None,
        ))
        .await
        .expect("complete course");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/v1/courses", Some(&token), None))
        .await
        .expect("list courses");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let titles: Vec<&str> = body["courses"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Rust 101", "SQL", "Async"]);
    assert_eq!(body["courses"][0]["completed"], true);
    assert_eq!(body["next_course_id"], second.id.as_str());
}

#[tokio::test]
async fn second_reaction_hits_the_uniqueness_constraint() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;
    let course = test_support::insert_course(ctx.state.db(), &option.id, "Rust 101", 1).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/react", course.id),
            Some(&token),
            Some(json!({"emoji": "love"})),
        ))
        .await
        .expect("react");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "ok");

    let progress =
        repositories::progress::find_for_student_course(ctx.state.db(), &student.id, &course.id)
            .await
            .expect("progress query")
            .expect("progress row");
    assert!(progress.reacted);

    let reaction = repositories::progress::find_reaction(ctx.state.db(), &student.id, &course.id)
        .await
        .expect("reaction query")
        .expect("reaction row");
    assert_eq!(reaction.course_id, course.id);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/react", course.id),
            Some(&token),
            Some(json!({"emoji": "like"})),
        ))
        .await
        .expect("react again");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {body}");
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn mentors_create_courses_students_cannot() {
    let ctx = test_support::setup_test_context().await;

    let option = test_support::insert_option(ctx.state.db(), "Backend").await;
    let mentor = test_support::insert_mentor(ctx.state.db(), "mentor", &option.id, "Rust").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &option.id).await;

    let mentor_token = test_support::bearer_token(&mentor.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&mentor_token),
            Some(json!({"title": "Rust 101", "order_index": 1})),
        ))
        .await
        .expect("create course");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["option_id"], option.id.as_str());

    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());
    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/courses",
            Some(&student_token),
            Some(json!({"title": "Sneaky", "order_index": 2})),
        ))
        .await
        .expect("create course as student");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn courses_of_other_options_are_off_limits() {
    let ctx = test_support::setup_test_context().await;

    let backend = test_support::insert_option(ctx.state.db(), "Backend").await;
    let frontend = test_support::insert_option(ctx.state.db(), "Frontend").await;
    let student = test_support::insert_student(ctx.state.db(), "ada", &backend.id).await;
    let course = test_support::insert_course(ctx.state.db(), &frontend.id, "CSS Grid", 1).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/courses/{}/complete", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("complete foreign course");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
