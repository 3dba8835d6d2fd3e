use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub subject_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub is_verified: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task joined with its author's username, the shape task listings
/// respond with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskDetail {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub username: String,
    pub subject_id: Option<i32>,
    pub title: String,
    pub description: String,
    pub is_verified: bool,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
