use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub subject_id: i32,
    pub academic_group_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
