use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::success;
use crate::middleware::AuthUser;
use crate::repositories::{
    ApplicationRepository, GroupRepository, GroupUserRepository, UserRepository,
};
use crate::services::ApplicationService;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub username: String,
    pub status: String,
}

type Service =
    ApplicationService<UserRepository, GroupRepository, GroupUserRepository, ApplicationRepository>;

async fn service() -> Result<Service, ApiError> {
    let pool = pool().await?;
    Ok(ApplicationService::new(
        UserRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupUserRepository::new(pool.clone()),
        ApplicationRepository::new(pool.clone()),
    ))
}

/// POST /api/groups/:group_id/applications - apply to join a group
pub async fn apply(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
    Json(payload): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let application = service()
        .await?
        .apply(&auth.username, group_id, &payload.message)
        .await?;

    tracing::info!(
        username = %auth.username,
        group_id,
        application_id = application.application_id,
        "application submitted"
    );
    Ok((StatusCode::CREATED, Json(success(json!(application)))))
}

/// POST /api/groups/:group_id/applications/review - decide a pending application
pub async fn review(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Value>, ApiError> {
    let application = service()
        .await?
        .review(group_id, &payload.username, &auth.username, &payload.status)
        .await?;

    tracing::info!(
        reviewer = %auth.username,
        group_id,
        target = %payload.username,
        status = %application.status,
        "application reviewed"
    );
    Ok(Json(success(json!(application))))
}

/// GET /api/applications/pending - pending applications across the
/// caller's managed groups
pub async fn pending(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let applications = service().await?.pending_for_reviewer(&auth.username).await?;
    Ok(Json(success(json!(applications))))
}
