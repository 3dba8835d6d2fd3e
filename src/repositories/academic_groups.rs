use sqlx::PgPool;

use crate::database::models::AcademicGroup;
use crate::repositories::map_write_error;
use crate::store::StoreError;

#[derive(Clone)]
pub struct AcademicGroupRepository {
    pool: PgPool,
}

impl AcademicGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn by_id(&self, id: i32) -> Result<Option<AcademicGroup>, StoreError> {
        let group = sqlx::query_as::<_, AcademicGroup>(
            "SELECT * FROM academic_groups WHERE academic_group_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(group)
    }

    pub async fn create(&self, name: &str) -> Result<AcademicGroup, StoreError> {
        sqlx::query_as::<_, AcademicGroup>(
            "INSERT INTO academic_groups (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    pub async fn update_name(&self, id: i32, name: &str) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE academic_groups SET name = $2 WHERE academic_group_id = $1")
                .bind(id)
                .bind(name)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM academic_groups WHERE academic_group_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn all(&self) -> Result<Vec<AcademicGroup>, StoreError> {
        let groups = sqlx::query_as::<_, AcademicGroup>(
            "SELECT * FROM academic_groups ORDER BY academic_group_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(groups)
    }
}
