use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{GroupUser, UserSummary};
use crate::repositories::map_write_error;
use crate::store::{MembershipStore, StoreError};

#[derive(Clone)]
pub struct GroupUserRepository {
    pool: PgPool,
}

impl GroupUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, group_id: i32, user_id: i32) -> Result<Option<GroupUser>, StoreError> {
        let row = sqlx::query_as::<_, GroupUser>(
            "SELECT * FROM group_users WHERE group_id = $1 AND user_id = $2",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn create(
        &self,
        group_id: i32,
        user_id: i32,
        role: &str,
    ) -> Result<GroupUser, StoreError> {
        sqlx::query_as::<_, GroupUser>(
            r#"
            INSERT INTO group_users (group_id, user_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    pub async fn delete(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM group_users WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn members_of(&self, group_id: i32) -> Result<Vec<UserSummary>, StoreError> {
        let members = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.user_id, u.username, u.created_at
            FROM group_users gu
            JOIN users u ON u.user_id = gu.user_id
            WHERE gu.group_id = $1
            ORDER BY gu.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}

#[async_trait]
impl MembershipStore for GroupUserRepository {
    async fn is_member(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
        let member: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM group_users WHERE group_id = $1 AND user_id = $2)",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }
}
