//! Integration tests for signup, login, me and logout

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_success_sets_cookie() {
    let app = common::TestApp::new().await;
    let username = common::unique_username();

    let response = app
        .post("/api/signup", json!({ "username": username, "password": "password" }), None)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["username"], username.as_str());
    assert_eq!(response.body["workouts"], json!([]));
    assert!(response.body.get("password_hash").is_none());

    let cookie = response.set_cookie.as_deref().unwrap();
    assert!(cookie.starts_with("access_token_cookie="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(response.token().is_some());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_duplicate_username() {
    let app = common::TestApp::new().await;
    let username = common::unique_username();
    let body = json!({ "username": username, "password": "password" });

    let first = app.post("/api/signup", body.clone(), None).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app.post("/api/signup", body, None).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["error"]["message"], "Username already exists");
    assert!(second.set_cookie.is_none());

    assert_eq!(app.count_users_named(&username).await, 1);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_signup_short_username_creates_nothing() {
    let app = common::TestApp::new().await;

    let response = app
        .post("/api/signup", json!({ "username": "abc", "password": "password" }), None)
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.count_users_named("abc").await, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_usernames_are_case_sensitive() {
    let app = common::TestApp::new().await;
    let username = common::unique_username();

    let lower = app
        .post("/api/signup", json!({ "username": username, "password": "password" }), None)
        .await;
    assert_eq!(lower.status, StatusCode::CREATED);

    let upper = app
        .post(
            "/api/signup",
            json!({ "username": username.to_uppercase(), "password": "password" }),
            None,
        )
        .await;
    assert_eq!(upper.status, StatusCode::CREATED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_cookie_resolves_same_user() {
    let app = common::TestApp::new().await;
    let (id, username, _) = app.signup().await;

    let login = app
        .post("/api/login", json!({ "username": username, "password": "password" }), None)
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["id"], id);

    let token = login.token().unwrap();
    let me = app.get("/api/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["id"], id);
    assert_eq!(me.body["username"], username.as_str());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_failures_share_message() {
    let app = common::TestApp::new().await;
    let (_, username, _) = app.signup().await;

    let wrong_password = app
        .post("/api/login", json!({ "username": username, "password": "passw0rd" }), None)
        .await;
    let unknown_user = app
        .post(
            "/api/login",
            json!({ "username": common::unique_username(), "password": "password" }),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert_eq!(
        wrong_password.body["error"]["message"],
        "Invalid username or password"
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_me_lists_own_workouts() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;
    let workout_id = app.create_workout(&token, "Lunge").await;

    let me = app.get("/api/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);

    let workouts = me.body["workouts"].as_array().unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0]["id"], workout_id);
    assert_eq!(workouts[0]["title"], "Lunge");
    assert!(workouts[0].get("user").is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_me_after_user_deleted_is_404() {
    let app = common::TestApp::new().await;
    let (id, _, token) = app.signup().await;

    workout_tracker_backend::repositories::UserRepository::delete(&app.pool, id)
        .await
        .unwrap();

    let me = app.get("/api/me", Some(&token)).await;
    assert_eq!(me.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_logout_then_cookie_is_cleared() {
    let app = common::TestApp::new().await;
    let (_, _, token) = app.signup().await;

    let response = app.delete("/api/logout", Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Successfully logged out");
    assert!(response.token().is_none());
    assert!(response.set_cookie.unwrap().contains("Max-Age=0"));
}
