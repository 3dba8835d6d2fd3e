use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::{success, success_page, PageQuery};
use crate::middleware::AuthUser;
use crate::repositories::{
    GroupRepository, GroupUserRepository, SubjectRepository, TaskRepository, UserRepository,
};
use crate::services::{task_service::CreateTask, TaskService};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub group_id: i32,
    pub subject_id: Option<i32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
}

async fn service() -> Result<TaskService, ApiError> {
    let pool = pool().await?;
    Ok(TaskService::new(
        TaskRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
        GroupRepository::new(pool.clone()),
        GroupUserRepository::new(pool.clone()),
        SubjectRepository::new(pool.clone()),
    ))
}

/// POST /api/tasks - post a task into one of the caller's groups
pub async fn create(
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let task = service()
        .await?
        .create(
            &auth.username,
            CreateTask {
                group_id: payload.group_id,
                subject_id: payload.subject_id,
                title: &payload.title,
                description: &payload.description,
                deadline: payload.deadline,
            },
        )
        .await?;

    tracing::info!(username = %auth.username, task_id = task.id, "task created");
    Ok((StatusCode::CREATED, Json(success(json!(task)))))
}

/// GET /api/tasks - tasks across all of the caller's groups
pub async fn feed(Extension(auth): Extension<AuthUser>) -> Result<Json<Value>, ApiError> {
    let tasks = service().await?.feed(&auth.username).await?;
    Ok(Json(success(json!(tasks))))
}

/// GET /api/tasks/:id
pub async fn show(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let task = service().await?.get(&auth.username, id).await?;
    Ok(Json(success(json!(task))))
}

/// GET /api/groups/:id/subjects/:subject_id/tasks
pub async fn by_subject(
    Extension(auth): Extension<AuthUser>,
    Path((group_id, subject_id)): Path<(i32, i32)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>, ApiError> {
    let (limit, offset) = query.limits();
    let (tasks, total) = service()
        .await?
        .by_subject(&auth.username, group_id, subject_id, limit, offset)
        .await?;
    Ok(Json(success_page(json!(tasks), total, &query)))
}

/// GET /api/groups/:id/tasks
pub async fn by_group(
    Extension(auth): Extension<AuthUser>,
    Path(group_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let tasks = service().await?.by_group(&auth.username, group_id).await?;
    Ok(Json(success(json!(tasks))))
}

/// POST /api/tasks/:id/verify - admin/moderator mark as verified
pub async fn verify(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    service().await?.verify(&auth.username, id).await?;
    tracing::info!(username = %auth.username, task_id = id, "task verified");
    Ok(Json(success(json!({ "id": id, "is_verified": true }))))
}

/// DELETE /api/tasks/:id
pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    service().await?.delete(&auth.username, id).await?;
    Ok(Json(success(json!({ "id": id }))))
}
