use sqlx::PgPool;

use crate::database::models::Subject;
use crate::repositories::map_write_error;
use crate::store::StoreError;

#[derive(Clone)]
pub struct SubjectRepository {
    pool: PgPool,
}

impl SubjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn by_id(&self, id: i32) -> Result<Option<Subject>, StoreError> {
        let subject = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE subject_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(subject)
    }

    pub async fn create(&self, name: &str, academic_group_id: i32) -> Result<Subject, StoreError> {
        sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, academic_group_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(academic_group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    pub async fn update_name(&self, id: i32, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE subjects SET name = $2 WHERE subject_id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM subjects WHERE subject_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Subjects of the academic groups behind every group the user
    /// administers, moderates, or belongs to.
    pub async fn by_user_groups(
        &self,
        user_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Subject>, i64), StoreError> {
        const FILTER: &str = r#"
            s.academic_group_id IN (
                SELECT DISTINCT g.academic_group_id FROM groups g
                WHERE g.admin_id = $1
                   OR EXISTS (
                       SELECT 1 FROM group_users gu
                       WHERE gu.group_id = g.id AND gu.user_id = $1)
                   OR EXISTS (
                       SELECT 1 FROM group_moders gm
                       WHERE gm.group_id = g.id AND gm.user_id = $1))
        "#;

        let count_sql = format!("SELECT COUNT(*) FROM subjects s WHERE {FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "SELECT s.* FROM subjects s WHERE {FILTER} ORDER BY s.subject_id LIMIT $2 OFFSET $3"
        );
        let subjects = sqlx::query_as::<_, Subject>(&page_sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((subjects, total))
    }

    pub async fn by_academic_group(
        &self,
        academic_group_id: i32,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Subject>, i64), StoreError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE academic_group_id = $1")
                .bind(academic_group_id)
                .fetch_one(&self.pool)
                .await?;

        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT * FROM subjects
            WHERE academic_group_id = $1
            ORDER BY subject_id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(academic_group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((subjects, total))
    }
}
