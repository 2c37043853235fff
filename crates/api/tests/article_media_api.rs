//! HTTP-level integration tests for the article and media endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get};
use sqlx::PgPool;
use studio_db::models::article::{CreateArticle, SOURCE_MANUAL};
use studio_db::models::media::CreateMedia;
use studio_db::repositories::{ArticleRepo, MediaRepo};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

async fn seed_article(pool: &PgPool, text: &str) -> i64 {
    ArticleRepo::create(
        pool,
        &CreateArticle {
            user_id: 1,
            persona_id: None,
            source: SOURCE_MANUAL.to_string(),
            url: None,
            text: text.to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_media(pool: &PgPool, article_id: i64, media_type: &str, concept: &str) -> i64 {
    MediaRepo::create(
        pool,
        &CreateMedia {
            article_id: Some(article_id),
            persona_id: None,
            media_type: media_type.to_string(),
            style: "anime".to_string(),
            prompt: format!("{concept}. Style: anime."),
            concept: Some(concept.to_string()),
            media_url: format!("https://cdn.example.com/{}.bin", concept.replace(' ', "-")),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn articles_are_listed_newest_first_with_pagination(pool: PgPool) {
    seed_article(&pool, "first").await;
    seed_article(&pool, "second").await;
    seed_article(&pool, "third").await;

    let json = body_json(get(common::build_test_app(pool.clone()), "/api/v1/articles").await).await;
    let texts: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["third", "second", "first"]);

    let json = body_json(
        get(
            common::build_test_app(pool),
            "/api/v1/articles?limit=1&offset=1",
        )
        .await,
    )
    .await;
    let page = json["data"].as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["text"], "second");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn article_get_and_missing(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;

    let response = get(common::build_test_app(pool.clone()), &format!("/api/v1/articles/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["source"], "manual");
    assert_eq!(json["data"]["user_id"], 1);
    assert!(json["data"]["date_created"].is_string());

    let response = get(common::build_test_app(pool), "/api/v1/articles/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_article_removes_its_media(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;
    let media_id = seed_media(&pool, id, "image", "harbor").await;

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/v1/articles/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(common::build_test_app(pool.clone()), &format!("/api/v1/media/{media_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(common::build_test_app(pool), &format!("/api/v1/articles/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn article_media_urls_filter_by_type(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;
    seed_media(&pool, id, "image", "one").await;
    seed_media(&pool, id, "video", "two").await;
    seed_media(&pool, id, "image", "three").await;

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/articles/{id}/media"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/articles/{id}/media?media_type=image"),
        )
        .await,
    )
    .await;
    assert_eq!(
        json["data"],
        serde_json::json!([
            "https://cdn.example.com/one.bin",
            "https://cdn.example.com/three.bin"
        ])
    );

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/articles/{id}/media?media_type=gif"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(common::build_test_app(pool), "/api/v1/articles/999999/media").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_list_includes_article_source(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;
    seed_media(&pool, id, "image", "harbor").await;

    let json = body_json(get(common::build_test_app(pool), "/api/v1/media").await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["article_source"], "manual");
    assert_eq!(items[0]["concept"], "harbor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_search_matches_concepts(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;
    seed_media(&pool, id, "image", "red fox").await;
    seed_media(&pool, id, "image", "blue whale").await;

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            "/api/v1/media?search=%20%20FOX%20",
        )
        .await,
    )
    .await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["concept"], "red fox");

    let json = body_json(get(common::build_test_app(pool), "/api/v1/media?search=%20").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn media_get_and_delete(pool: PgPool) {
    let id = seed_article(&pool, "Body").await;
    let media_id = seed_media(&pool, id, "image", "harbor").await;

    let response = get(common::build_test_app(pool.clone()), &format!("/api/v1/media/{media_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["style"], "anime");

    let response = delete(common::build_test_app(pool.clone()), &format!("/api/v1/media/{media_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(common::build_test_app(pool), &format!("/api/v1/media/{media_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
