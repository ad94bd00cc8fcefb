//! Integration tests for the clip catalog against a real database.

use reelgen_core::clip::{ClipFilter, Season, TimeOfDay};
use reelgen_core::store::ClipCatalog;
use reelgen_db::models::clip::CreateClip;
use reelgen_db::repositories::ClipRepo;
use reelgen_db::PgClipCatalog;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_clip(location: &str, time_of_day: &str, season: &str, duration_secs: f64) -> CreateClip {
    CreateClip {
        filename: format!("{location}_{time_of_day}_{season}.mp4"),
        location: location.to_string(),
        time_of_day: time_of_day.to_string(),
        season: season.to_string(),
        duration_secs,
        tags: vec!["city".to_string()],
        storage_path: format!("clips/{location}.mp4"),
    }
}

fn paris_day_summer() -> ClipFilter {
    ClipFilter {
        location: "Paris".to_string(),
        time_of_day: TimeOfDay::Day,
        season: Season::Summer,
    }
}

async fn seed(pool: &PgPool) {
    for _ in 0..10 {
        ClipRepo::create(pool, &new_clip("Paris", "day", "summer", 4.0))
            .await
            .unwrap();
    }
    ClipRepo::create(pool, &new_clip("Paris", "night", "summer", 4.0))
        .await
        .unwrap();
    ClipRepo::create(pool, &new_clip("Tokyo", "sunset", "autumn", 6.0))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_and_find_clip(pool: PgPool) {
    let created = ClipRepo::create(&pool, &new_clip("Oslo", "sunrise", "winter", 3.5))
        .await
        .unwrap();
    let found = ClipRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();

    assert_eq!(found.location, "Oslo");
    assert_eq!(found.tags, vec!["city".to_string()]);
    assert!((found.duration_secs - 3.5).abs() < f64::EPSILON);
}

#[sqlx::test]
async fn check_constraints_reject_bad_clips(pool: PgPool) {
    let bad_time = ClipRepo::create(&pool, &new_clip("Oslo", "dusk", "winter", 3.0)).await;
    assert!(bad_time.is_err(), "unknown time_of_day must be rejected");

    let bad_duration = ClipRepo::create(&pool, &new_clip("Oslo", "day", "winter", 0.0)).await;
    assert!(bad_duration.is_err(), "zero duration must be rejected");
}

#[sqlx::test]
async fn candidates_are_filtered_and_capped(pool: PgPool) {
    seed(&pool).await;
    let catalog = PgClipCatalog::new(pool);

    let found = catalog.find_candidates(&paris_day_summer(), 8).await.unwrap();
    assert_eq!(found.len(), 8);
    assert!(found.iter().all(|c| paris_day_summer().matches(c)));
}

#[sqlx::test]
async fn candidate_membership_is_stable(pool: PgPool) {
    seed(&pool).await;
    let catalog = PgClipCatalog::new(pool);

    let mut first: Vec<_> = catalog
        .find_candidates(&paris_day_summer(), 50)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    let mut second: Vec<_> = catalog
        .find_candidates(&paris_day_summer(), 50)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    first.sort_unstable();
    second.sort_unstable();

    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
}

#[sqlx::test]
async fn no_matching_clips_is_empty(pool: PgPool) {
    seed(&pool).await;
    let catalog = PgClipCatalog::new(pool);

    let filter = ClipFilter {
        location: "Atlantis".to_string(),
        ..paris_day_summer()
    };
    assert!(catalog.find_candidates(&filter, 8).await.unwrap().is_empty());
}

#[sqlx::test]
async fn parameters_list_distinct_values(pool: PgPool) {
    seed(&pool).await;
    let catalog = PgClipCatalog::new(pool);

    let params = catalog.parameters().await.unwrap();
    assert_eq!(params.locations, vec!["Paris", "Tokyo"]);
    assert_eq!(params.times, vec!["day", "night", "sunset"]);
    assert_eq!(params.seasons, vec!["autumn", "summer"]);
}
