use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Group, GroupDetail, GroupUser};
use crate::store::{GroupStore, StoreError};

const DETAIL_SELECT: &str = r#"
    SELECT g.id,
           g.name,
           u.username AS admin_username,
           g.academic_group_id,
           a.name AS academic_group_name
    FROM groups g
    JOIN users u ON u.user_id = g.admin_id
    JOIN academic_groups a ON a.academic_group_id = g.academic_group_id
"#;

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the group and the admin's membership row in one
    /// transaction, so a created group always lists its admin.
    pub async fn create_with_admin(
        &self,
        name: &str,
        academic_group_id: i32,
        admin_id: i32,
    ) -> Result<Group, StoreError> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, academic_group_id, admin_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(academic_group_id)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_users (group_id, user_id, role)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(group.id)
        .bind(admin_id)
        .bind(GroupUser::ROLE_ADMIN)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(group)
    }

    pub async fn by_id(&self, id: i32) -> Result<Option<Group>, StoreError> {
        let group = sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(group)
    }

    pub async fn detail(&self, id: i32) -> Result<Option<GroupDetail>, StoreError> {
        let sql = format!("{DETAIL_SELECT} WHERE g.id = $1");
        let detail = sqlx::query_as::<_, GroupDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    pub async fn update_name(&self, id: i32, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE groups SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Groups the user can still apply to: not the admin, not a member,
    /// not a moderator.
    pub async fn available(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GroupDetail>, i64), StoreError> {
        const FILTER: &str = r#"
            g.admin_id <> $1
            AND NOT EXISTS (
                SELECT 1 FROM group_users gu WHERE gu.group_id = g.id AND gu.user_id = $1)
            AND NOT EXISTS (
                SELECT 1 FROM group_moders gm WHERE gm.group_id = g.id AND gm.user_id = $1)
        "#;

        let count_sql = format!("SELECT COUNT(*) FROM groups g WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!("{DETAIL_SELECT} WHERE {FILTER} ORDER BY g.id LIMIT $2 OFFSET $3");
        let groups = sqlx::query_as::<_, GroupDetail>(&page_sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((groups, total))
    }

    /// Ids of every group the user administers, moderates, or belongs
    /// to. Unpaginated; feeds the cross-group task listing.
    pub async fn visible_group_ids(&self, user_id: i32) -> Result<Vec<i32>, StoreError> {
        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            SELECT g.id FROM groups g
            WHERE g.admin_id = $1
               OR EXISTS (
                   SELECT 1 FROM group_users gu WHERE gu.group_id = g.id AND gu.user_id = $1)
               OR EXISTS (
                   SELECT 1 FROM group_moders gm WHERE gm.group_id = g.id AND gm.user_id = $1)
            ORDER BY g.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Groups the user belongs to or moderates.
    pub async fn user_groups(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<GroupDetail>, i64), StoreError> {
        const FILTER: &str = r#"
            EXISTS (SELECT 1 FROM group_users gu WHERE gu.group_id = g.id AND gu.user_id = $1)
            OR EXISTS (SELECT 1 FROM group_moders gm WHERE gm.group_id = g.id AND gm.user_id = $1)
        "#;

        let count_sql = format!("SELECT COUNT(*) FROM groups g WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let page_sql =
            format!("{DETAIL_SELECT} WHERE {FILTER} ORDER BY g.id LIMIT $2 OFFSET $3");
        let groups = sqlx::query_as::<_, GroupDetail>(&page_sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((groups, total))
    }
}

#[async_trait]
impl GroupStore for GroupRepository {
    async fn is_admin_or_moderator(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<bool, StoreError> {
        let authorized: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM groups WHERE id = $1 AND admin_id = $2)
                OR EXISTS (SELECT 1 FROM group_moders WHERE group_id = $1 AND user_id = $2)
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(authorized)
    }

    async fn managed_by(&self, user_id: i32) -> Result<Vec<Group>, StoreError> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT g.* FROM groups g
            WHERE g.admin_id = $1
               OR EXISTS (
                   SELECT 1 FROM group_moders gm WHERE gm.group_id = g.id AND gm.user_id = $1)
            ORDER BY g.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }
}
