use reqwest::StatusCode;

use serde_json::json;

use sqlx::SqlitePool;

use crate::helpers::{TestApp, TestUser};

#[sqlx::test(migrations = "./migrations")]
async fn favorites_can_be_added_and_listed(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    TestUser::register_and_login(&pool, &app).await;

    let res = app
        .add_favorite(&json!({ "mediaId": 550, "mediaType": "movie" }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app
        .add_favorite(&json!({ "mediaId": 60735, "mediaType": "tv" }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app.favorites().await.expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(true, body["success"].as_bool().unwrap());
    assert_eq!(json!([550]), body["data"]["favoriteMovies"]);
    assert_eq!(json!([60735]), body["data"]["favoriteTvShows"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn adding_a_favorite_twice_keeps_one_entry(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    TestUser::register_and_login(&pool, &app).await;

    for _ in 0..2 {
        let res = app
            .add_favorite(&json!({ "mediaId": 550, "mediaType": "movie" }))
            .await
            .expect("Failed to execute request");
        assert!(res.status().is_success());
    }

    let res = app.favorites().await.expect("Failed to execute request");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json!([550]), body["data"]["favoriteMovies"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn favorites_can_be_removed(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    TestUser::register_and_login(&pool, &app).await;

    app.add_favorite(&json!({ "mediaId": 550, "mediaType": "movie" }))
        .await
        .expect("Failed to execute request");

    let res = app
        .remove_favorite(&json!({ "mediaId": 550, "mediaType": "movie" }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let res = app.favorites().await.expect("Failed to execute request");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json!([]), body["data"]["favoriteMovies"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn invalid_favorite_payloads_are_rejected(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    TestUser::register_and_login(&pool, &app).await;

    let test_cases = vec![
        ("missing media id", json!({ "mediaType": "movie" })),
        ("missing media type", json!({ "mediaId": 550 })),
        ("unknown media type", json!({ "mediaId": 550, "mediaType": "podcast" })),
    ];

    for (desc, body) in test_cases {
        let res = app
            .add_favorite(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when payload was {}",
            desc
        );
    }

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn favorites_require_authentication(pool: SqlitePool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app.favorites().await.expect("Failed to execute request");

    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    Ok(())
}
