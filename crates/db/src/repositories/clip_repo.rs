//! Repository for the `video_clips` table.

use reelgen_core::types::DbId;
use sqlx::PgPool;

use crate::models::clip::{ClipRow, CreateClip};

/// Column list for `video_clips` queries.
const COLUMNS: &str = "\
    id, filename, location, time_of_day, season, duration_secs, \
    tags, storage_path, created_at";

/// Read access to the clip catalog, plus inserts for ingestion.
pub struct ClipRepo;

impl ClipRepo {
    /// Insert a new clip.
    pub async fn create(pool: &PgPool, input: &CreateClip) -> Result<ClipRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_clips \
                (filename, location, time_of_day, season, duration_secs, tags, storage_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClipRow>(&query)
            .bind(&input.filename)
            .bind(&input.location)
            .bind(&input.time_of_day)
            .bind(&input.season)
            .bind(input.duration_secs)
            .bind(&input.tags)
            .bind(&input.storage_path)
            .fetch_one(pool)
            .await
    }

    /// Find a clip by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClipRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_clips WHERE id = $1");
        sqlx::query_as::<_, ClipRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Random sample of at most `limit` clips matching all three filters.
    pub async fn find_candidates(
        pool: &PgPool,
        location: &str,
        time_of_day: &str,
        season: &str,
        limit: i64,
    ) -> Result<Vec<ClipRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_clips \
             WHERE location = $1 AND time_of_day = $2 AND season = $3 \
             ORDER BY RANDOM() \
             LIMIT $4"
        );
        sqlx::query_as::<_, ClipRow>(&query)
            .bind(location)
            .bind(time_of_day)
            .bind(season)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Distinct locations present in the catalog, sorted.
    pub async fn distinct_locations(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT location FROM video_clips ORDER BY location")
            .fetch_all(pool)
            .await
    }

    /// Distinct times of day present in the catalog, sorted.
    pub async fn distinct_times_of_day(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT time_of_day FROM video_clips ORDER BY time_of_day")
            .fetch_all(pool)
            .await
    }

    /// Distinct seasons present in the catalog, sorted.
    pub async fn distinct_seasons(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT DISTINCT season FROM video_clips ORDER BY season")
            .fetch_all(pool)
            .await
    }
}
