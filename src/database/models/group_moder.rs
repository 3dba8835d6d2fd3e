use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Elevated rights on a group short of admin. Only ever inserted
/// directly; no workflow promotes an applicant to moderator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupModer {
    pub group_id: i32,
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
}
