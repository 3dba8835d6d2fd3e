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
    GroupModerRepository, GroupRepository, GroupUserRepository, UserRepository,
};
use crate::services::{GroupService, ServiceError};

#[derive(Debug, Deserialize)]
pub struct AddModeratorRequest {
    pub username: String,
}

async fn service() -> Result<GroupService, ApiError> {
    let pool = pool().await?;
    Ok(GroupService::new(
        UserRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupUserRepository::new(pool.clone()),
        GroupModerRepository::new(pool.clone()),
    ))
}

/// GET /api/groups/:id/moders - moderator listing
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let svc = service().await?;
    if !svc.can_view(group_id, &auth.username).await? {
        return Err(ServiceError::Unauthorized.into());
    }
    let moderators = svc.moderators(group_id).await?;
    Ok(Json(success(json!(moderators))))
}

/// POST /api/groups/:id/moders - appoint a moderator
pub async fn add(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
    Json(payload): Json<AddModeratorRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    service()
        .await?
        .add_moderator(group_id, &auth.username, &payload.username)
        .await?;

    tracing::info!(acting = %auth.username, group_id, target = %payload.username, "moderator added");
    Ok((
        StatusCode::CREATED,
        Json(success(json!({ "group_id": group_id, "username": payload.username }))),
    ))
}

/// DELETE /api/groups/:id/moders/:username - revoke a moderator
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path((group_id, username)): Path<(i32, String)>,
) -> Result<Json<Value>, ApiError> {
    service()
        .await?
        .remove_moderator(group_id, &auth.username, &username)
        .await?;

    tracing::info!(acting = %auth.username, group_id, target = %username, "moderator removed");
    Ok(Json(success(json!({ "group_id": group_id, "username": username }))))
}
