//! Router-level tests. These exercise routing and the authentication
//! middleware only; nothing here touches a database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use space_api::app;

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn root_is_public() {
    let response = app().oneshot(get("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let response = app()
        .oneshot(get("/api/applications/pending"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let request = Request::builder()
        .uri("/api/groups/my")
        .header("Authorization", "Bearer not-a-jwt")
        .body(Body::empty())
        .expect("request");

    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected() {
    let request = Request::builder()
        .uri("/api/groups/my")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .expect("request");

    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn subject_scoped_reads_are_routed_and_gated() {
    for uri in [
        "/api/groups/1/subjects",
        "/api/groups/1/subjects/2/tasks",
        "/api/subjects/my",
        "/api/tasks/1",
    ] {
        let response = app().oneshot(get(uri)).await.expect("response");
        // Registered (not 404) and behind the auth middleware.
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let response = app().oneshot(get("/api/nope")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
