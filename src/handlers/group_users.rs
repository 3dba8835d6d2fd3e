use axum::{
    extract::{Extension, Path},
    response::Json,
};
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::success;
use crate::middleware::AuthUser;
use crate::repositories::{
    GroupModerRepository, GroupRepository, GroupUserRepository, UserRepository,
};
use crate::services::{GroupService, ServiceError};

async fn service() -> Result<GroupService, ApiError> {
    let pool = pool().await?;
    Ok(GroupService::new(
        UserRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupUserRepository::new(pool.clone()),
        GroupModerRepository::new(pool.clone()),
    ))
}

/// GET /api/groups/:id/users - member listing, visible to members and
/// managers only
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let svc = service().await?;
    if !svc.can_view(group_id, &auth.username).await? {
        return Err(ServiceError::Unauthorized.into());
    }
    let members = svc.members(group_id).await?;
    Ok(Json(success(json!(members))))
}

/// DELETE /api/groups/:id/users/:username - remove a member
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path((group_id, username)): Path<(i32, String)>,
) -> Result<Json<Value>, ApiError> {
    service()
        .await?
        .remove_member(group_id, &auth.username, &username)
        .await?;

    tracing::info!(acting = %auth.username, group_id, target = %username, "member removed");
    Ok(Json(success(json!({ "group_id": group_id, "username": username }))))
}
