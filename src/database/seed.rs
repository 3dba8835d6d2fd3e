use sqlx::PgPool;
use tracing::{debug, info};

use crate::database::DatabaseError;

const ACADEMIC_GROUPS: &[&str] = &["ЭФМО-01-24", "ИКБО-14-20", "ИКБО-15-20"];

// (subject name, index into ACADEMIC_GROUPS)
const SUBJECTS: &[(&str, usize)] = &[
    ("Mathematics", 0),
    ("Physics", 1),
    ("Computer Science", 0),
    ("English Literature", 1),
    ("History", 0),
];

/// Seeds the cohort and subject reference data. Idempotent: rows that
/// already exist are left untouched.
pub async fn run(pool: &PgPool) -> Result<(), DatabaseError> {
    seed_academic_groups(pool).await?;
    seed_subjects(pool).await?;
    Ok(())
}

async fn seed_academic_groups(pool: &PgPool) -> Result<(), DatabaseError> {
    for name in ACADEMIC_GROUPS {
        let inserted = sqlx::query(
            "INSERT INTO academic_groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .execute(pool)
        .await?;

        if inserted.rows_affected() == 0 {
            debug!(name, "academic group already exists, skipping");
        }
    }

    info!(count = ACADEMIC_GROUPS.len(), "academic groups seeded");
    Ok(())
}

async fn seed_subjects(pool: &PgPool) -> Result<(), DatabaseError> {
    for (name, group_index) in SUBJECTS {
        let academic_group = ACADEMIC_GROUPS[*group_index];

        let inserted = sqlx::query(
            r#"
            INSERT INTO subjects (name, academic_group_id)
            SELECT $1, academic_group_id FROM academic_groups WHERE name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(name)
        .bind(academic_group)
        .execute(pool)
        .await?;

        if inserted.rows_affected() == 0 {
            debug!(name, "subject already exists, skipping");
        } else {
            info!(name, academic_group, "seeded subject");
        }
    }

    Ok(())
}
