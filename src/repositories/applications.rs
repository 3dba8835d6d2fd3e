use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{
    ApplicationStatus, GroupApplication, GroupUser, PendingApplication,
};
use crate::repositories::map_write_error;
use crate::store::{ApplicationStore, StoreError};

#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn create(
        &self,
        group_id: i32,
        user_id: i32,
        message: &str,
    ) -> Result<GroupApplication, StoreError> {
        // The partial unique index on pending rows turns a racing
        // duplicate into StoreError::Conflict.
        sqlx::query_as::<_, GroupApplication>(
            r#"
            INSERT INTO group_applications (group_id, user_id, message, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(message)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn exists_pending(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM group_applications
                WHERE group_id = $1 AND user_id = $2 AND status = $3)
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn pending_by_group(
        &self,
        group_id: i32,
    ) -> Result<Vec<PendingApplication>, StoreError> {
        let applications = sqlx::query_as::<_, PendingApplication>(
            r#"
            SELECT ga.application_id,
                   ga.group_id,
                   ga.user_id,
                   u.username,
                   ga.message,
                   ga.status,
                   ga.created_at
            FROM group_applications ga
            JOIN users u ON u.user_id = ga.user_id
            WHERE ga.group_id = $1 AND ga.status = $2
            ORDER BY ga.application_id
            "#,
        )
        .bind(group_id)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    async fn pending_application(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<Option<GroupApplication>, StoreError> {
        let application = sqlx::query_as::<_, GroupApplication>(
            r#"
            SELECT * FROM group_applications
            WHERE group_id = $1 AND user_id = $2 AND status = $3
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(application)
    }

    async fn approve(&self, application: &GroupApplication) -> Result<(), StoreError> {
        // Status update and membership insert commit or roll back together.
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE group_applications SET status = $2 WHERE application_id = $1")
            .bind(application.application_id)
            .bind(ApplicationStatus::Approved.as_str())
            .execute(&mut *tx)
            .await?;

        // A membership row may already exist if the user was added
        // directly between the workflow's checks and this commit.
        sqlx::query(
            r#"
            INSERT INTO group_users (group_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, user_id) DO NOTHING
            "#,
        )
        .bind(application.group_id)
        .bind(application.user_id)
        .bind(GroupUser::ROLE_MEMBER)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn reject(&self, application_id: i32) -> Result<(), StoreError> {
        sqlx::query("UPDATE group_applications SET status = $2 WHERE application_id = $1")
            .bind(application_id)
            .bind(ApplicationStatus::Rejected.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
