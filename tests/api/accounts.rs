use reqwest::StatusCode;

use serde_json::json;

use sqlx::SqlitePool;

use crate::helpers::{TestApp, TestUser};

#[sqlx::test(migrations = "./migrations")]
async fn signup_creates_a_user_record(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .signup(&json!({
            "username": "flashfan",
            "email": "flashfan@test.com",
            "password": "test_password",
        }))
        .await
        .expect("Failed to execute request");

    assert!(res.status().is_success());

    let (username, password_hash): (String, String) =
        sqlx::query_as("select username, password_hash from users where email = 'flashfan@test.com'")
            .fetch_one(&pool)
            .await
            .expect("Failed to fetch created user");

    assert_eq!("flashfan", username);
    // The password must never be stored in the clear
    assert_ne!("test_password", password_hash);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn signup_rejects_taken_email_and_username(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .signup(&json!({
            "username": "flashfan",
            "email": "flashfan@test.com",
            "password": "test_password",
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app
        .signup(&json!({
            "username": "someone_else",
            "email": "flashfan@test.com",
            "password": "test_password",
        }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        "A user with this email already exists",
        body["message"].as_str().unwrap()
    );

    let res = app
        .signup(&json!({
            "username": "flashfan",
            "email": "other@test.com",
            "password": "test_password",
        }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        "This username is already taken",
        body["message"].as_str().unwrap()
    );

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn signup_rejects_invalid_payloads(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let test_cases = vec![
        (
            "malformed email",
            json!({ "username": "flashfan", "email": "not an email", "password": "test_password" }),
        ),
        (
            "blank username",
            json!({ "username": "   ", "email": "flashfan@test.com", "password": "test_password" }),
        ),
        (
            "short password",
            json!({ "username": "flashfan", "email": "flashfan@test.com", "password": "short" }),
        ),
    ];

    for (desc, body) in test_cases {
        let res = app.signup(&body).await.expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when payload was {}",
            desc
        );
    }

    let users: i64 = sqlx::query_scalar("select count(*) from users")
        .fetch_one(&pool)
        .await?;
    assert_eq!(0, users);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn login_establishes_a_session(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let user = TestUser::register_and_login(&pool, &app).await;

    let res = app.session().await.expect("Failed to execute request");

    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(true, body["success"].as_bool().unwrap());
    assert_eq!(user.username, body["user"]["username"].as_str().unwrap());
    assert_eq!(user.email, body["user"]["email"].as_str().unwrap());
    assert_eq!(user.id.to_string(), body["user"]["id"].as_str().unwrap());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn login_rejects_bad_credentials(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let user = TestUser::register(&pool, "testuser", "testuser@test.com", "test_password").await;

    let res = app
        .login(&json!({ "email": user.email, "password": "wrong_password" }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    let res = app
        .login(&json!({ "email": "unknown@test.com", "password": "test_password" }))
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn session_requires_a_token(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.session().await.expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn logout_clears_the_session(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    TestUser::register_and_login(&pool, &app).await;

    let res = app.session().await.expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app.logout().await.expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app.session().await.expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    Ok(())
}
