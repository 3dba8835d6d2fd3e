use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::models::{Task, TaskDetail};
use crate::repositories::map_write_error;
use crate::store::StoreError;

const DETAIL_SELECT: &str = r#"
    SELECT t.id,
           t.group_id,
           t.user_id,
           u.username,
           t.subject_id,
           t.title,
           t.description,
           t.is_verified,
           t.deadline,
           t.created_at
    FROM tasks t
    JOIN users u ON u.user_id = t.user_id
"#;

pub struct NewTask<'a> {
    pub group_id: i32,
    pub user_id: i32,
    pub subject_id: Option<i32>,
    pub title: &'a str,
    pub description: &'a str,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, task: NewTask<'_>) -> Result<Task, StoreError> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (group_id, user_id, subject_id, title, description, deadline)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(task.group_id)
        .bind(task.user_id)
        .bind(task.subject_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.deadline)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    pub async fn by_id(&self, id: i32) -> Result<Option<Task>, StoreError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn by_group(&self, group_id: i32) -> Result<Vec<TaskDetail>, StoreError> {
        let sql = format!("{DETAIL_SELECT} WHERE t.group_id = $1 ORDER BY t.created_at DESC");
        let tasks = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(group_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Tasks for one subject within a group, newest first.
    pub async fn by_group_and_subject(
        &self,
        group_id: i32,
        subject_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<TaskDetail>, i64), StoreError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks WHERE group_id = $1 AND subject_id = $2",
        )
        .bind(group_id)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "{DETAIL_SELECT} WHERE t.group_id = $1 AND t.subject_id = $2 \
             ORDER BY t.created_at DESC LIMIT $3 OFFSET $4"
        );
        let tasks = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(group_id)
            .bind(subject_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((tasks, total))
    }

    /// Tasks across all of a user's groups, newest first.
    pub async fn by_groups(&self, group_ids: &[i32]) -> Result<Vec<TaskDetail>, StoreError> {
        let sql = format!("{DETAIL_SELECT} WHERE t.group_id = ANY($1) ORDER BY t.created_at DESC");
        let tasks = sqlx::query_as::<_, TaskDetail>(&sql)
            .bind(group_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn set_verified(&self, id: i32, verified: bool) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE tasks SET is_verified = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(verified)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
