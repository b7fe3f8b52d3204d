//! Reset the database to a small demo data set
//!
//! Creates three users (password `password`) with 5 to 10 random workouts
//! each from the past year. Existing users and workouts are removed first.

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;
use workout_tracker_backend::{
    config::AppConfig,
    db,
    repositories::{NewUser, UserRepository, WorkoutRepository},
};
use workout_tracker_shared::WorkoutDraft;

const USERNAMES: &[&str] = &["Chris", "Mathias", "Will"];
const PASSWORD: &str = "password";
const TITLES: &[&str] = &[
    "Bench Press",
    "Bicep Curl",
    "Lat Row",
    "Lunge",
    "Squat",
    "Tricep Extension",
    "Crunch",
    "Plank",
    "Leg Extension",
    "Deadlift",
];

fn random_workouts(today: NaiveDate) -> Vec<WorkoutDraft> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(5..=10);

    (0..count)
        .map(|_| WorkoutDraft {
            title: TITLES.choose(&mut rng).copied().unwrap_or("Squat").to_string(),
            duration: Some(rng.gen_range(30..=90)),
            date: Some(today - Duration::days(rng.gen_range(0..=365))),
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,workout_tracker_backend=info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    info!("Seeding database...");
    let today = Utc::now().date_naive();

    let mut tx = pool.begin().await?;

    let workouts_removed = WorkoutRepository::delete_all(&mut *tx).await?;
    let users_removed = UserRepository::delete_all(&mut *tx).await?;
    info!(users_removed, workouts_removed, "Cleared existing data");

    for &username in USERNAMES {
        let new_user = NewUser::new(username)
            .set_password(PASSWORD.to_string())
            .await?;
        let user = UserRepository::create(&mut *tx, &new_user).await?;

        let drafts = random_workouts(today);
        for draft in &drafts {
            WorkoutRepository::create(&mut *tx, user.id, draft).await?;
        }
        info!(user_id = user.id, username, workouts = drafts.len(), "User seeded");
    }

    tx.commit().await?;

    info!("Database seeding complete");
    Ok(())
}
