//! Integration tests for the workouts API

mod common;

use axum::http::StatusCode;
use serde_json::json;
use workout_tracker_backend::repositories::{UserRepository, WorkoutRepository};

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_workout_owned_by_caller() {
    let app = common::TestApp::new().await;
    let (id, username, token) = app.signup().await;

    let response = app
        .post(
            "/api/workouts",
            json!({ "title": "Squat", "duration": 30, "date": "2024-02-10", "user_id": 999999 }),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["title"], "Squat");
    assert_eq!(response.body["duration"], 30);
    assert_eq!(response.body["date"], "2024-02-10");
    assert_eq!(response.body["user"], json!({ "id": id, "username": username }));
    assert!(response.body.get("user_id").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_workout_optional_fields_null() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;

    let response = app
        .post("/api/workouts", json!({ "title": "Plank" }), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.body["duration"].is_null());
    assert!(response.body["date"].is_null());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_workout_invalid_is_422() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;

    let response = app
        .post("/api/workouts", json!({ "title": "Crunch", "duration": 0 }), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["error"]["details"],
        json!(["Duration must be a positive number"])
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_other_users_workouts_are_invisible_and_protected() {
    let app = common::TestApp::new().await;
    let (_, _, owner) = app.signup().await;
    let (_, _, intruder) = app.signup().await;
    let workout_id = app.create_workout(&owner, "Deadlift").await;

    let listing = app.get("/api/workouts", Some(&intruder)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body["total"], 0);
    assert_eq!(listing.body["items"], json!([]));

    let path = format!("/api/workouts/{}", workout_id);
    let patch = app.patch(&path, json!({ "title": "Mine now" }), Some(&intruder)).await;
    assert_eq!(patch.status, StatusCode::FORBIDDEN);

    let delete = app.delete(&path, Some(&intruder)).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let still_there = WorkoutRepository::find_by_id(&app.pool, workout_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_there.title, "Deadlift");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_pagination_eight_items_five_per_page() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;

    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(app.create_workout(&token, &format!("Workout {}", i)).await);
    }

    let first = app.get("/api/workouts?page=1&per_page=5", Some(&token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["total"], 8);
    assert_eq!(first.body["total_pages"], 2);
    assert_eq!(first.body["page"], 1);
    assert_eq!(first.body["per_page"], 5);
    let first_items = first.body["items"].as_array().unwrap();
    assert_eq!(first_items.len(), 5);
    assert_eq!(first_items[0]["id"], ids[0]);

    let second = app.get("/api/workouts?page=2&per_page=5", Some(&token)).await;
    let second_items = second.body["items"].as_array().unwrap();
    assert_eq!(second_items.len(), 3);
    assert_eq!(second_items[2]["id"], ids[7]);

    let beyond = app.get("/api/workouts?page=3&per_page=5", Some(&token)).await;
    assert_eq!(beyond.status, StatusCode::OK);
    assert_eq!(beyond.body["items"], json!([]));
    assert_eq!(beyond.body["total"], 8);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_pagination_defaults() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    for _ in 0..6 {
        app.create_workout(&token, "Lat Row").await;
    }

    let response = app.get("/api/workouts?page=abc", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["per_page"], 5);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_patch_duration_only_keeps_other_fields() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    let workout_id = app.create_workout(&token, "Bench Press").await;

    let path = format!("/api/workouts/{}", workout_id);
    let response = app.patch(&path, json!({ "duration": 45 }), Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["duration"], 45);
    assert_eq!(response.body["title"], "Bench Press");
    assert_eq!(response.body["date"], "2024-03-01");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_patch_invalid_rolls_back() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    let workout_id = app.create_workout(&token, "Bicep Curl").await;

    let path = format!("/api/workouts/{}", workout_id);
    let response = app.patch(&path, json!({ "title": "" }), Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let unchanged = WorkoutRepository::find_by_id(&app.pool, workout_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.title, "Bicep Curl");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_patch_null_clears_optional_field() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    let workout_id = app.create_workout(&token, "Leg Extension").await;

    let path = format!("/api/workouts/{}", workout_id);
    let response = app.patch(&path, json!({ "date": null }), Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["date"].is_null());
    assert_eq!(response.body["duration"], 45);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_workout() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    let workout_id = app.create_workout(&token, "Tricep Extension").await;

    let path = format!("/api/workouts/{}", workout_id);
    let response = app.delete(&path, Some(&token)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_null());

    let again = app.delete(&path, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_missing_workout_is_404() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;

    let response = app
        .patch("/api/workouts/9223372036854775807", json!({ "duration": 10 }), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_deleting_user_cascades_to_workouts() {
    let app = common::TestApp::new().await;
    let (owner_id, _, owner) = app.signup().await;
    let (_, _, other) = app.signup().await;
    let first = app.create_workout(&owner, "Squat").await;
    let second = app.create_workout(&owner, "Lunge").await;

    assert!(UserRepository::delete(&app.pool, owner_id).await.unwrap());

    for id in [first, second] {
        assert!(WorkoutRepository::find_by_id(&app.pool, id)
            .await
            .unwrap()
            .is_none());

        let path = format!("/api/workouts/{}", id);
        let response = app.patch(&path, json!({ "duration": 10 }), Some(&other)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_create_for_deleted_owner_is_422() {
    let app = common::TestApp::new().await;
    let (id, _, token) = app.signup().await;

    assert!(UserRepository::delete(&app.pool, id).await.unwrap());

    let response = app
        .post("/api/workouts", json!({ "title": "Squat" }), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["error"]["details"],
        json!(["Workout owner no longer exists"])
    );

    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
        .bind(id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(orphans, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_foreign_key_cascades_on_plain_user_delete() {
    let app = common::TestApp::new().await;
    let (owner_id, _, owner) = app.signup().await;
    let (_, _, other) = app.signup().await;
    let ids = [
        app.create_workout(&owner, "Crunch").await,
        app.create_workout(&owner, "Plank").await,
    ];

    // Bypass the repository so only the schema removes the workouts
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(owner_id)
        .execute(&app.pool)
        .await
        .unwrap();
    assert_eq!(deleted.rows_affected(), 1);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM workouts WHERE user_id = $1")
        .bind(owner_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    for id in ids {
        let path = format!("/api/workouts/{}", id);
        let response = app.patch(&path, json!({ "duration": 10 }), Some(&other)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
