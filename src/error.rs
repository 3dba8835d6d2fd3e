// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotAuthenticated => {
                ApiError::unauthorized("Authentication required")
            }
            ServiceError::InvalidCredentials => {
                ApiError::unauthorized("Invalid username or password")
            }
            ServiceError::Unauthorized => {
                ApiError::forbidden("You do not have permission to perform this action")
            }
            ServiceError::UserNotFound(username) => {
                ApiError::not_found(format!("User '{}' not found", username))
            }
            ServiceError::GroupNotFound(id) => {
                ApiError::not_found(format!("Group {} not found", id))
            }
            ServiceError::SubjectNotFound(id) => {
                ApiError::not_found(format!("Subject {} not found", id))
            }
            ServiceError::TaskNotFound(id) => {
                ApiError::not_found(format!("Task {} not found", id))
            }
            ServiceError::AcademicGroupNotFound(id) => {
                ApiError::not_found(format!("Academic group {} not found", id))
            }
            ServiceError::ApplicationNotFound => {
                ApiError::not_found("No pending application found")
            }
            ServiceError::AlreadyMember => {
                ApiError::bad_request("User is already a member of this group")
            }
            ServiceError::AlreadyModerator => {
                ApiError::bad_request("User is already a moderator of this group")
            }
            ServiceError::NotAMember(username) => {
                ApiError::not_found(format!("User '{}' is not a member of this group", username))
            }
            ServiceError::NotAModerator(username) => {
                ApiError::not_found(format!(
                    "User '{}' is not a moderator of this group",
                    username
                ))
            }
            ServiceError::DuplicateApplication => {
                ApiError::bad_request("A pending application already exists for this group")
            }
            ServiceError::InvalidStatus(value) => {
                ApiError::bad_request(format!("Invalid application status '{}'", value))
            }
            ServiceError::MissingField(field) => {
                ApiError::bad_request(format!("Field '{}' is required", field))
            }
            ServiceError::UserExists => {
                ApiError::conflict("Username or email is already taken")
            }
            ServiceError::NameTaken => {
                ApiError::conflict("Name is already taken")
            }
            ServiceError::PasswordHash(e) => {
                // Log the real error but return generic message
                tracing::error!("Password hashing error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ServiceError::Store(e) => {
                tracing::error!("Store error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::service_unavailable("Database temporarily unavailable")
    }
}

impl From<crate::store::StoreError> for ApiError {
    fn from(err: crate::store::StoreError) -> Self {
        tracing::error!("Store error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_the_right_statuses() {
        let cases = [
            (ServiceError::NotAuthenticated, 401),
            (ServiceError::InvalidCredentials, 401),
            (ServiceError::Unauthorized, 403),
            (ServiceError::UserNotFound("x".into()), 404),
            (ServiceError::ApplicationNotFound, 404),
            (ServiceError::AlreadyMember, 400),
            (ServiceError::DuplicateApplication, 400),
            (ServiceError::InvalidStatus("maybe".into()), 400),
            (ServiceError::UserExists, 409),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn missing_role_is_not_found_and_names_the_role() {
        let not_member = ApiError::from(ServiceError::NotAMember("carol".into()));
        assert_eq!(not_member.status_code(), 404);
        assert!(not_member.message().contains("not a member"));

        let not_moderator = ApiError::from(ServiceError::NotAModerator("carol".into()));
        assert_eq!(not_moderator.status_code(), 404);
        assert!(not_moderator.message().contains("not a moderator"));
    }
}
