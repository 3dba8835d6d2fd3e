use axum::{extract::Path, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::success;
use crate::repositories::AcademicGroupRepository;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct AcademicGroupRequest {
    pub name: String,
}

async fn repository() -> Result<AcademicGroupRepository, ApiError> {
    let pool = pool().await?;
    Ok(AcademicGroupRepository::new(pool.clone()))
}

/// GET /api/academic-groups - the full cohort list, small by nature
pub async fn list() -> Result<Json<Value>, ApiError> {
    let groups = repository().await?.all().await?;
    Ok(Json(success(json!(groups))))
}

/// POST /api/academic-groups
pub async fn create(
    Json(payload): Json<AcademicGroupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Field 'name' is required"));
    }
    let group = match repository().await?.create(&payload.name).await {
        Ok(group) => group,
        Err(StoreError::Conflict) => {
            return Err(ApiError::conflict("Name is already taken"));
        }
        Err(e) => return Err(e.into()),
    };
    Ok((StatusCode::CREATED, Json(success(json!(group)))))
}

/// PUT /api/academic-groups/:id
pub async fn rename(
    Path(id): Path<i32>,
    Json(payload): Json<AcademicGroupRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Field 'name' is required"));
    }
    if !repository().await?.update_name(id, &payload.name).await? {
        return Err(ApiError::not_found(format!("Academic group {} not found", id)));
    }
    Ok(Json(success(json!({ "academic_group_id": id, "name": payload.name }))))
}

/// DELETE /api/academic-groups/:id
pub async fn remove(Path(id): Path<i32>) -> Result<Json<Value>, ApiError> {
    if !repository().await?.delete(id).await? {
        return Err(ApiError::not_found(format!("Academic group {} not found", id)));
    }
    Ok(Json(success(json!({ "academic_group_id": id }))))
}
