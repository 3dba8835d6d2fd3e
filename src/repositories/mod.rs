//! Postgres implementations of the store traits plus the plain CRUD
//! repositories the handlers use directly.

pub mod academic_groups;
pub mod applications;
pub mod group_moders;
pub mod group_users;
pub mod groups;
pub mod subjects;
pub mod tasks;
pub mod users;

pub use academic_groups::AcademicGroupRepository;
pub use applications::ApplicationRepository;
pub use group_moders::GroupModerRepository;
pub use group_users::GroupUserRepository;
pub use groups::GroupRepository;
pub use subjects::SubjectRepository;
pub use tasks::TaskRepository;
pub use users::UserRepository;

use crate::store::StoreError;

/// Folds unique/key violations into `StoreError::Conflict` so callers
/// can map them to domain errors instead of a 500.
pub(crate) fn map_write_error(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Database(e),
    }
}
