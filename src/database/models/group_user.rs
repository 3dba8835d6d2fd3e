use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Accepted membership of a user in a group. Unique per (group, user).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupUser {
    pub group_id: i32,
    pub user_id: i32,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

impl GroupUser {
    pub const ROLE_MEMBER: &'static str = "member";
    pub const ROLE_ADMIN: &'static str = "admin";
}
