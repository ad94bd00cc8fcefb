//! Repository for the `generated_videos` table.
//!
//! Status literals come from `GenerationStatus`; terminal updates only touch
//! rows still in `processing`.

use reelgen_core::job::GenerationStatus;
use reelgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::generated_video::GeneratedVideoRow;

/// Column list for `generated_videos` queries.
const COLUMNS: &str = "\
    id, user_parameters, clip_sequence, output_filename, status_id, \
    created_at, completed_at";

/// Provides create / read / terminal-update operations for generation jobs.
pub struct GeneratedVideoRepo;

impl GeneratedVideoRepo {
    /// Insert a new job in `processing` status with its frozen plan.
    pub async fn create(
        pool: &PgPool,
        user_parameters: &serde_json::Value,
        clip_sequence: &serde_json::Value,
    ) -> Result<GeneratedVideoRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO generated_videos (user_parameters, clip_sequence, status_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GeneratedVideoRow>(&query)
            .bind(user_parameters)
            .bind(clip_sequence)
            .bind(GenerationStatus::Processing.id())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GeneratedVideoRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generated_videos WHERE id = $1");
        sqlx::query_as::<_, GeneratedVideoRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a processing job as completed with its output reference.
    ///
    /// Returns `false` if the job does not exist or is no longer processing.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        output_filename: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_videos \
             SET status_id = $2, output_filename = $3, completed_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(GenerationStatus::Completed.id())
        .bind(output_filename)
        .bind(GenerationStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a processing job as failed. The output reference stays NULL.
    ///
    /// Returns `false` if the job does not exist or is no longer processing.
    pub async fn fail(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generated_videos \
             SET status_id = $2, completed_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(GenerationStatus::Failed.id())
        .bind(GenerationStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
