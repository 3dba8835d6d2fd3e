use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::{success, success_page, PageQuery};
use crate::middleware::AuthUser;
use crate::repositories::{
    GroupModerRepository, GroupRepository, GroupUserRepository, UserRepository,
};
use crate::services::GroupService;

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub academic_group_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub name: String,
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

/// POST /api/groups - create a group with the caller as admin
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let group = service()
        .await?
        .create(&auth.username, &payload.name, payload.academic_group_id)
        .await?;

    tracing::info!(username = %auth.username, group_id = group.id, "group created");
    Ok((StatusCode::CREATED, Json(success(json!(group)))))
}

/// GET /api/groups/:id
pub async fn show(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    let group = service().await?.detail(id).await?;
    Ok(Json(success(json!(group))))
}

/// PUT /api/groups/:id - admin-only rename
pub async fn rename(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<RenameGroupRequest>,
) -> Result<Json<Value>, ApiError> {
    service()
        .await?
        .rename(id, &auth.username, &payload.name)
        .await?;
    Ok(Json(success(json!({ "id": id, "name": payload.name }))))
}

/// DELETE /api/groups/:id - admin-only delete
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    service().await?.delete(id, &auth.username).await?;
    tracing::info!(username = %auth.username, group_id = id, "group deleted");
    Ok(Json(success(json!({ "id": id }))))
}

/// GET /api/groups/available - groups the caller can apply to
pub async fn available(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limits();
    let (groups, total) = service()
        .await?
        .available(&auth.username, limit, offset)
        .await?;
    Ok(Json(success_page(json!(groups), total, &query)))
}

/// GET /api/groups/my - groups the caller belongs to or moderates
pub async fn my(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limits();
    let (groups, total) = service()
        .await?
        .joined(&auth.username, limit, offset)
        .await?;
    Ok(Json(success_page(json!(groups), total, &query)))
}
