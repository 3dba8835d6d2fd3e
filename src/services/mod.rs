//! Business logic over the store traits and repositories. Handlers call
//! into these; everything HTTP-shaped stays out of this layer.

pub mod application_service;
pub mod auth_service;
pub mod group_service;
pub mod subject_service;
pub mod task_service;

pub use application_service::ApplicationService;
pub use auth_service::AuthService;
pub use group_service::GroupService;
pub use subject_service::SubjectService;
pub use task_service::TaskService;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no verified identity for this operation")]
    NotAuthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("caller lacks admin or moderator standing")]
    Unauthorized,

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("group {0} not found")]
    GroupNotFound(i32),

    #[error("subject {0} not found")]
    SubjectNotFound(i32),

    #[error("task {0} not found")]
    TaskNotFound(i32),

    #[error("academic group {0} not found")]
    AcademicGroupNotFound(i32),

    #[error("no pending application for this group and user")]
    ApplicationNotFound,

    #[error("user is already a member of the group")]
    AlreadyMember,

    #[error("user is already a moderator of the group")]
    AlreadyModerator,

    #[error("user '{0}' is not a member of the group")]
    NotAMember(String),

    #[error("user '{0}' is not a moderator of the group")]
    NotAModerator(String),

    #[error("a pending application already exists for this group and user")]
    DuplicateApplication,

    #[error("invalid application status: {0}")]
    InvalidStatus(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("username or email already taken")]
    UserExists,

    #[error("name already taken")]
    NameTaken,

    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Token(#[from] crate::auth::JwtError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
