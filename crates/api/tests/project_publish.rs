//! Integration tests for publishing: `/project/new` and `/project/modify`.

mod common;

use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, LOCATION};
use axum::http::{Method, Request, StatusCode};
use common::{
    admin_token, body_json, body_string, get, get_with_token, member_token, post_form, project,
    send,
};
use opencircle_api::middleware::sensitive::SENSITIVE_CONTENT_MSG;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_form_requires_login() {
    let app = common::build_test_app();

    let response = get(app.router(), "/project/new").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    let response = get_with_token(app.router(), "/project/new", &member_token(1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "projects/new.html");
}

#[tokio::test]
async fn create_without_name_shows_the_form_again() {
    let app = common::build_test_app();
    let token = member_token(1);

    let response = post_form(app.router(), "/project/new", Some(&token), "name=&uri=gin").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "projects/new.html");
    assert!(app.projects.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_publishes_as_the_current_user() {
    let app = common::build_test_app();
    let token = member_token(7);

    let response = post_form(
        app.router(),
        "/project/new",
        Some(&token),
        "name=Gin&uri=Gin&src=https%3A%2F%2Fgithub.com%2Fgin-gonic%2Fgin",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"errno": 0, "msg": ""})
    );

    let published = app.projects.published.lock().unwrap().clone();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, 7);
    assert_eq!(published[0].1.name, "Gin");

    let created = app.projects.get(1).unwrap();
    assert_eq!(created.uri, "gin");
    assert_eq!(created.user_id, 7);
}

#[tokio::test]
async fn create_ignores_a_posted_id() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(3, "gin", 1)]);

    let response = post_form(
        app.router(),
        "/project/new",
        Some(&member_token(2)),
        "id=3&name=Echo&uri=echo",
    )
    .await;
    assert_eq!(body_json(response).await["errno"], 0);
    assert_eq!(app.projects.get(3).unwrap().name, "Project 3");
    assert_eq!(app.projects.get(4).unwrap().uri, "echo");
}

#[tokio::test]
async fn create_failure_hides_the_cause() {
    let app = common::build_test_app();
    app.projects.fail_publish.store(true, Ordering::SeqCst);

    let response = post_form(
        app.router(),
        "/project/new",
        Some(&member_token(1)),
        "name=Gin&uri=gin",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"errno": 1, "msg": "Internal server error!"})
    );
}

#[tokio::test]
async fn create_with_invalid_uri_fails() {
    let app = common::build_test_app();

    let response = post_form(
        app.router(),
        "/project/new",
        Some(&member_token(1)),
        "name=Gin&uri=not%20a%20slug",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["errno"], 1);
    assert!(app.projects.get(1).is_none());
}

#[tokio::test]
async fn create_with_sensitive_word_is_rejected() {
    let app = common::build_test_app();

    let response = post_form(
        app.router(),
        "/project/new",
        Some(&member_token(1)),
        "name=Gin&uri=gin&description=totally+FORBIDDEN+stuff",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["errno"], 1);
    assert_eq!(json["msg"], SENSITIVE_CONTENT_MSG);
    assert!(app.projects.published.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Modify
// ---------------------------------------------------------------------------

#[tokio::test]
async fn modify_without_valid_id_redirects_for_any_method() {
    let app = common::build_test_app();
    let token = member_token(1);

    for uri in ["/project/modify", "/project/modify?id=0", "/project/modify?id=abc"] {
        let response = get_with_token(app.router(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "GET {uri}");
        assert_eq!(response.headers()[LOCATION], "/projects");

        let response = post_form(app.router(), uri, Some(&token), "name=Gin").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {uri}");
        assert_eq!(response.headers()[LOCATION], "/projects");
    }
    assert!(app.projects.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn modify_without_body_or_id_redirects_before_reading_the_body() {
    let app = common::build_test_app();
    let token = member_token(1);

    for uri in ["/project/modify", "/project/modify?id=0"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = send(app.router(), request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "POST {uri}");
        assert_eq!(response.headers()[LOCATION], "/projects");
    }
    assert!(app.projects.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn modify_with_id_but_no_form_is_rejected() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/project/modify?id=4")
        .header(AUTHORIZATION, format!("Bearer {}", member_token(1)))
        .body(Body::empty())
        .unwrap();
    let response = send(app.router(), request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(app.projects.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn modify_takes_id_from_the_form_body() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let response = post_form(
        app.router(),
        "/project/modify",
        Some(&member_token(1)),
        "id=4&name=Gin+Web&uri=gin",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["errno"], 0);
    assert_eq!(app.projects.get(4).unwrap().name, "Gin Web");
}

#[tokio::test]
async fn form_id_wins_over_query_id() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1), project(5, "echo", 1)]);

    let response = post_form(
        app.router(),
        "/project/modify?id=5",
        Some(&member_token(1)),
        "id=4&name=Gin+Web&uri=gin",
    )
    .await;
    assert_eq!(body_json(response).await["errno"], 0);
    assert_eq!(app.projects.get(4).unwrap().name, "Gin Web");
    assert_eq!(app.projects.get(5).unwrap().name, "Project 5");
}

#[tokio::test]
async fn modify_form_is_filled_from_the_record() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let response = get_with_token(app.router(), "/project/modify?id=4", &member_token(1)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "projects/new.html");
    assert_eq!(json["data"]["project"]["id"], 4);
    assert_eq!(json["data"]["project"]["uri"], "gin");
}

#[tokio::test]
async fn modify_form_for_missing_project_redirects() {
    let app = common::build_test_app();

    let response = get_with_token(app.router(), "/project/modify?id=99", &member_token(1)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn modify_by_owner_succeeds() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let response = post_form(
        app.router(),
        "/project/modify?id=4",
        Some(&member_token(1)),
        "name=Gin+Web&uri=gin",
    )
    .await;
    assert_eq!(body_json(response).await["errno"], 0);
    assert_eq!(app.projects.get(4).unwrap().name, "Gin Web");

    let published = app.projects.published.lock().unwrap().clone();
    assert_eq!(published[0].1.id, "4");
}

#[tokio::test]
async fn modify_by_someone_else_is_forbidden() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let response = post_form(
        app.router(),
        "/project/modify?id=4",
        Some(&member_token(2)),
        "name=Hijacked&uri=gin",
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_string(response).await,
        "No permission to modify this project"
    );
    assert_eq!(app.projects.get(4).unwrap().name, "Project 4");
}

#[tokio::test]
async fn admin_may_modify_any_project() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);

    let response = post_form(
        app.router(),
        "/project/modify?id=4",
        Some(&admin_token(99)),
        "name=Moderated&uri=gin",
    )
    .await;
    assert_eq!(body_json(response).await["errno"], 0);
    assert_eq!(app.projects.get(4).unwrap().name, "Moderated");
}

#[tokio::test]
async fn modify_failure_uses_the_generic_envelope() {
    let app = common::build_test_app();
    app.projects.seed(vec![project(4, "gin", 1)]);
    app.projects.fail_publish.store(true, Ordering::SeqCst);

    let response = post_form(
        app.router(),
        "/project/modify?id=4",
        Some(&member_token(1)),
        "name=Gin&uri=gin",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"errno": 1, "msg": "Internal server error!"})
    );
}
