//! Store traits the membership/application workflow depends on.
//!
//! The Postgres implementations live in `crate::repositories`; the
//! workflow itself only sees these seams, so its decision logic can be
//! exercised against in-memory stores in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Group, GroupApplication, PendingApplication, User};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Write collided with an existing row (unique or key violation).
    #[error("conflicts with an existing row")]
    Conflict,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Durable user records, keyed by username/email.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}

/// Group records and the management queries over them.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// True iff the user is the group's admin or a registered moderator.
    /// Absence of either row yields `false`, never an error.
    async fn is_admin_or_moderator(&self, group_id: i32, user_id: i32)
        -> Result<bool, StoreError>;

    /// Groups the user administers or moderates, in store order.
    async fn managed_by(&self, user_id: i32) -> Result<Vec<Group>, StoreError>;
}

/// Accepted memberships (`group_users` rows).
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn is_member(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError>;
}

/// Join applications keyed by (group, user) with a status field.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Inserts a new pending application. A collision with the partial
    /// unique index on pending rows surfaces as `StoreError::Conflict`.
    async fn create(
        &self,
        group_id: i32,
        user_id: i32,
        message: &str,
    ) -> Result<GroupApplication, StoreError>;

    async fn exists_pending(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError>;

    async fn pending_by_group(&self, group_id: i32)
        -> Result<Vec<PendingApplication>, StoreError>;

    /// The pending application for (group, user), if one exists.
    async fn pending_application(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<Option<GroupApplication>, StoreError>;

    /// Marks the application approved and inserts the membership row,
    /// both in one transaction.
    async fn approve(&self, application: &GroupApplication) -> Result<(), StoreError>;

    /// Marks the application rejected. No membership row.
    async fn reject(&self, application_id: i32) -> Result<(), StoreError>;
}
