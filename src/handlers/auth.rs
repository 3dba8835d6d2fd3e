use axum::{http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config;
use crate::database::models::UserSummary;
use crate::database::pool;
use crate::error::ApiError;
use crate::handlers::success;
use crate::repositories::UserRepository;
use crate::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

async fn service() -> Result<AuthService<UserRepository>, ApiError> {
    let pool = pool().await?;
    Ok(AuthService::new(UserRepository::new(pool.clone())))
}

/// POST /register - create an account
pub async fn register(
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let user = service()
        .await?
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    tracing::info!(username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(success(json!(user)))))
}

/// POST /login - authenticate and receive a JWT
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<Value>, ApiError> {
    let (token, user) = service()
        .await?
        .login(&payload.username, &payload.password)
        .await?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    Ok(Json(success(json!({
        "token": token,
        "user": UserSummary::from(&user),
        "expires_in": expires_in
    }))))
}
