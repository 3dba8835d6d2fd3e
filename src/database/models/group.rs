use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A study group. Exactly one admin; tied to one academic group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub academic_group_id: i32,
    pub admin_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Group row joined with its admin username and academic group name,
/// the shape list/detail endpoints respond with.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupDetail {
    pub id: i32,
    pub name: String,
    pub admin_username: String,
    pub academic_group_id: i32,
    pub academic_group_name: String,
}
