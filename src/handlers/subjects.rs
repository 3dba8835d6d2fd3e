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
    AcademicGroupRepository, GroupModerRepository, GroupRepository, GroupUserRepository,
    SubjectRepository, UserRepository,
};
use crate::services::{GroupService, ServiceError, SubjectService};

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub academic_group_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct RenameSubjectRequest {
    pub name: String,
}

async fn service() -> Result<SubjectService, ApiError> {
    let pool = pool().await?;
    Ok(SubjectService::new(
        SubjectRepository::new(pool.clone()),
        AcademicGroupRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
    ))
}

async fn group_service() -> Result<GroupService, ApiError> {
    let pool = pool().await?;
    Ok(GroupService::new(
        UserRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupUserRepository::new(pool.clone()),
        GroupModerRepository::new(pool.clone()),
    ))
}

/// POST /api/subjects
pub async fn create(
    Json(payload): Json<CreateSubjectRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let subject = service()
        .await?
        .create(&payload.name, payload.academic_group_id)
        .await?;
    Ok((StatusCode::CREATED, Json(success(json!(subject)))))
}

/// GET /api/subjects/:id
pub async fn show(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    let subject = service().await?.get(id).await?;
    Ok(Json(success(json!(subject))))
}

/// PUT /api/subjects/:id
pub async fn rename(
    Path(id): Path<i32>,
    Json(payload): Json<RenameSubjectRequest>,
) -> Result<Json<Value>, ApiError> {
    service().await?.rename(id, &payload.name).await?;
    Ok(Json(success(json!({ "subject_id": id, "name": payload.name }))))
}

/// DELETE /api/subjects/:id
pub async fn remove(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    service().await?.delete(id).await?;
    Ok(Json(success(json!({ "subject_id": id }))))
}

/// GET /api/groups/:id/subjects - the subjects of the group's academic
/// group, visible to members and managers
pub async fn by_group(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let groups = group_service().await?;
    if !groups.can_view(group_id, &auth.username).await? {
        return Err(ServiceError::Unauthorized.into());
    }
    let group = groups.detail(group_id).await?;

    let (limit, offset) = query.limits();
    let (subjects, total) = service()
        .await?
        .by_academic_group(group.academic_group_id, limit, offset)
        .await?;
    Ok(Json(success_page(json!(subjects), total, &query)))
}

/// GET /api/subjects/my - subjects across the caller's groups
pub async fn mine(
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limits();
    let (subjects, total) = service()
        .await?
        .for_user(&auth.username, limit, offset)
        .await?;
    Ok(Json(success_page(json!(subjects), total, &query)))
}

/// GET /api/academic-groups/:id/subjects
pub async fn by_academic_group(
    Path(academic_group_id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limits();
    let (subjects, total) = service()
        .await?
        .by_academic_group(academic_group_id, limit, offset)
        .await?;
    Ok(Json(success_page(json!(subjects), total, &query)))
}
