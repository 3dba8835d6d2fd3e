use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A cohort/category a group belongs to, unrelated to group membership.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AcademicGroup {
    pub academic_group_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
