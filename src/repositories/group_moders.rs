use sqlx::PgPool;

use crate::database::models::{GroupModer, UserSummary};
use crate::repositories::map_write_error;
use crate::store::StoreError;

#[derive(Clone)]
pub struct GroupModerRepository {
    pool: PgPool,
}

impl GroupModerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, group_id: i32, user_id: i32) -> Result<GroupModer, StoreError> {
        sqlx::query_as::<_, GroupModer>(
            r#"
            INSERT INTO group_moders (group_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    pub async fn delete(&self, group_id: i32, user_id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM group_moders WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn moderators_of(&self, group_id: i32) -> Result<Vec<UserSummary>, StoreError> {
        let moderators = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.user_id, u.username, u.created_at
            FROM group_moders gm
            JOIN users u ON u.user_id = gm.user_id
            WHERE gm.group_id = $1
            ORDER BY gm.created_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(moderators)
    }
}
