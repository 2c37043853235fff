//! HTTP-level integration tests for `/generate` and `/publish`.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, create_persona, get, post_json, FakeImages, FakeText, TestProviders};
use secrecy::SecretString;
use sqlx::PgPool;
use studio_cloud::XPublisher;
use studio_db::models::article::{CreateArticle, SOURCE_MANUAL};
use studio_db::models::media::CreateMedia;
use studio_db::repositories::{ArticleRepo, MediaRepo};
use wiremock::matchers::{body_json as body_matches, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Article pipeline
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_from_text_returns_media_entries(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/generate",
        serde_json::json!({"text": "The lighthouse went dark.", "style": "anime"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["media_count"], 2);
    assert_eq!(data["media_entries"][0]["concept"], "A lighthouse at dusk");
    assert!(data["media_entries"][0]["media_url"]
        .as_str()
        .unwrap()
        .starts_with("https://fal.media/files/"));

    let article_id = data["article_id"].as_i64().unwrap();
    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/articles/{article_id}/media"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_from_link_records_url(pool: PgPool) {
    let persona_id = create_persona(&pool, "Nova").await;
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/generate",
        serde_json::json!({
            "link": "https://news.example.com/lighthouse",
            "persona_id": persona_id,
            "concept_count": 1
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["media_count"], 1);

    let article_id = json["data"]["article_id"].as_i64().unwrap();
    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/articles/{article_id}"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["url"], "https://news.example.com/lighthouse");
    assert_eq!(json["data"]["persona_id"], persona_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_without_input_is_400(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/generate",
        serde_json::json!({"style": "anime"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_with_unknown_persona_is_404(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/generate",
        serde_json::json!({"text": "Body", "persona_id": 424242}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_when_every_image_fails_is_502(pool: PgPool) {
    let providers = TestProviders {
        text: Some(FakeText::new(common::TWO_CONCEPTS)),
        images: Some(Arc::new(FakeImages {
            fail: true,
            ..Default::default()
        })),
        ..Default::default()
    };
    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/generate",
        serde_json::json!({"text": "Body"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_without_providers_is_503(pool: PgPool) {
    let response = post_json(
        common::build_test_app_with(pool, TestProviders::default()),
        "/api/v1/generate",
        serde_json::json!({"text": "Body"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Single-step generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_image_returns_url_and_metadata(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/generate/image",
        serde_json::json!({"prompt": "a lighthouse in fog"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["image_url"], "https://fal.media/files/1.png");
    assert_eq!(json["data"]["metadata"]["width"], 1024);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_image_with_private_reference_is_400(pool: PgPool) {
    for image_url in [
        "http://169.254.169.254/x.png",
        "http://[::ffff:127.0.0.1]/x.png",
    ] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/generate/image",
            serde_json::json!({"prompt": "a fox", "image_url": image_url}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{image_url}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generate_text_returns_model_output(pool: PgPool) {
    let providers = TestProviders {
        text: Some(FakeText::new("Hello from the model")),
        ..Default::default()
    };
    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/generate/text",
        serde_json::json!({"prompt": "Say hello"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["text"], "Hello from the model");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn compose_article_stores_generated_article(pool: PgPool) {
    let persona_id = create_persona(&pool, "Nova").await;
    let text = FakeText::new("Keepers of the light, a short history.");
    let providers = TestProviders {
        text: Some(text.clone()),
        ..Default::default()
    };

    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/generate/article",
        serde_json::json!({"topic": "lighthouses", "persona_id": persona_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["source"], "generated");
    assert_eq!(json["data"]["persona_id"], persona_id);
    assert!(text.prompts.lock().unwrap()[0].starts_with("You are Nova."));
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

async fn seed_media(pool: &PgPool, media_type: &str, media_url: &str) -> i64 {
    let article = ArticleRepo::create(
        pool,
        &CreateArticle {
            user_id: 1,
            persona_id: None,
            source: SOURCE_MANUAL.into(),
            url: None,
            text: "Body".into(),
        },
    )
    .await
    .unwrap();
    MediaRepo::create(
        pool,
        &CreateMedia {
            article_id: Some(article.id),
            persona_id: None,
            media_type: media_type.into(),
            style: "anime".into(),
            prompt: "p".into(),
            concept: None,
            media_url: media_url.into(),
        },
    )
    .await
    .unwrap()
    .id
}

fn publisher_for(server: &MockServer) -> Arc<XPublisher> {
    Arc::new(XPublisher::with_client(
        reqwest::Client::new(),
        server.uri(),
        SecretString::from("user-token".to_string()),
    ))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_posts_stored_image(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/media/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {"id": "77"}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(serde_json::json!({"data": {"id": "555", "text": "Look"}})),
        )
        .mount(&server)
        .await;

    let media_id = seed_media(&pool, "image", &format!("{}/cdn/a.png", server.uri())).await;
    let providers = TestProviders {
        publisher: Some(publisher_for(&server)),
        ..Default::default()
    };

    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/publish/x",
        serde_json::json!({"media_id": media_id, "text": "Look"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["post_id"], "555");
    assert_eq!(json["data"]["media_id"], "77");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_without_text_posts_media(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn/a.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/media/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {"id": "78"}})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(body_matches(serde_json::json!({"media": {"media_ids": ["78"]}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"data": {"id": "556"}})))
        .expect(1)
        .mount(&server)
        .await;

    let media_id = seed_media(&pool, "image", &format!("{}/cdn/a.png", server.uri())).await;
    let providers = TestProviders {
        publisher: Some(publisher_for(&server)),
        ..Default::default()
    };

    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/publish/x",
        serde_json::json!({"media_id": media_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["post_id"], "556");
    assert_eq!(json["data"]["text"], "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_video_is_rejected(pool: PgPool) {
    let server = MockServer::start().await;
    let media_id = seed_media(&pool, "video", "https://cdn.example.com/v.mp4").await;
    let providers = TestProviders {
        publisher: Some(publisher_for(&server)),
        ..Default::default()
    };

    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/publish/x",
        serde_json::json!({"media_id": media_id, "text": "Watch"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_unknown_media_is_404(pool: PgPool) {
    let server = MockServer::start().await;
    let providers = TestProviders {
        publisher: Some(publisher_for(&server)),
        ..Default::default()
    };
    let response = post_json(
        common::build_test_app_with(pool, providers),
        "/api/v1/publish/x",
        serde_json::json!({"media_id": 999999, "text": "Hi"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn publish_without_token_is_503(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/publish/x",
        serde_json::json!({"media_id": 1, "text": "Hi"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
