use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::jwt_auth_middleware;

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(handlers::health::health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "space-api",
        "description": "Course tracking backend"
    }))
}

fn public_routes() -> Router {
    use handlers::auth;

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

fn protected_routes() -> Router {
    use handlers::{academic_groups, applications, group_moders, group_users, groups, subjects, tasks};

    Router::new()
        // Groups
        .route("/api/groups", post(groups::create))
        .route("/api/groups/available", get(groups::available))
        .route("/api/groups/my", get(groups::my))
        .route(
            "/api/groups/:id",
            get(groups::show).put(groups::rename).delete(groups::remove),
        )
        // Membership
        .route("/api/groups/:id/users", get(group_users::list))
        .route("/api/groups/:id/users/:username", delete(group_users::remove))
        // Moderators
        .route(
            "/api/groups/:id/moders",
            get(group_moders::list).post(group_moders::add),
        )
        .route(
            "/api/groups/:id/moders/:username",
            delete(group_moders::remove),
        )
        // Join applications
        .route("/api/groups/:id/applications", post(applications::apply))
        .route(
            "/api/groups/:id/applications/review",
            post(applications::review),
        )
        .route("/api/applications/pending", get(applications::pending))
        // Academic groups
        .route(
            "/api/academic-groups",
            get(academic_groups::list).post(academic_groups::create),
        )
        .route(
            "/api/academic-groups/:id",
            put(academic_groups::rename).delete(academic_groups::remove),
        )
        .route(
            "/api/academic-groups/:id/subjects",
            get(subjects::by_academic_group),
        )
        // Subjects
        .route("/api/subjects", post(subjects::create))
        .route("/api/subjects/my", get(subjects::mine))
        .route(
            "/api/subjects/:id",
            get(subjects::show).put(subjects::rename).delete(subjects::remove),
        )
        .route("/api/groups/:id/subjects", get(subjects::by_group))
        // Tasks
        .route("/api/tasks", get(tasks::feed).post(tasks::create))
        .route("/api/tasks/:id", get(tasks::show).delete(tasks::remove))
        .route("/api/tasks/:id/verify", post(tasks::verify))
        .route("/api/groups/:id/tasks", get(tasks::by_group))
        .route(
            "/api/groups/:id/subjects/:subject_id/tasks",
            get(tasks::by_subject),
        )
        .layer(middleware::from_fn(jwt_auth_middleware))
}
