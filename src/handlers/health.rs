use axum::response::Json;
use serde_json::{json, Value};

use crate::database;
use crate::error::ApiError;
use crate::handlers::success;

/// GET /health - liveness plus a database round trip
pub async fn health() -> Result<Json<Value>, ApiError> {
    database::pool::health_check().await?;
    Ok(Json(success(json!({ "status": "ok" }))))
}
