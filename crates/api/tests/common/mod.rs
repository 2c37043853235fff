#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use studio_ai::{
    AiError, ArticleSource, FetchedArticle, GeneratedImage, ImageGenerator, ImageResult,
    TextGenerator,
};
use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_cloud::{ObjectStore, XPublisher};
use studio_pipeline::MediaPipeline;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
    }
}

// ---------------------------------------------------------------------------
// Fake providers
// ---------------------------------------------------------------------------

/// Text generator that always answers `reply` and records prompts.
pub struct FakeText {
    pub reply: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeText {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for FakeText {
    async fn infer(&self, prompt: &str) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Image generator returning numbered CDN URLs, or failing every call.
#[derive(Default)]
pub struct FakeImages {
    pub fail: bool,
    pub calls: Mutex<usize>,
}

#[async_trait]
impl ImageGenerator for FakeImages {
    async fn text_to_image(&self, _prompt: &str) -> Result<ImageResult, AiError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.fail {
            return Err(AiError::Api {
                provider: "fal.ai",
                status: 500,
                body: "boom".into(),
            });
        }
        Ok(ImageResult {
            images: vec![GeneratedImage {
                url: format!("https://fal.media/files/{n}.png"),
                width: Some(1024),
                height: Some(768),
                content_type: Some("image/png".into()),
            }],
            seed: Some(n as u64),
            prompt: None,
            has_nsfw_concepts: vec![],
        })
    }

    async fn image_to_image(&self, prompt: &str, _image_url: &str) -> Result<ImageResult, AiError> {
        self.text_to_image(prompt).await
    }
}

/// Article source returning a fixed article for any link.
pub struct FakeArticles;

#[async_trait]
impl ArticleSource for FakeArticles {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, AiError> {
        Ok(FetchedArticle {
            url: url.to_string(),
            title: Some("Lighthouses".into()),
            text: "The last lighthouse keeper retired this spring.".into(),
        })
    }
}

pub const TWO_CONCEPTS: &str = r#"["A lighthouse at dusk", "Keeper's empty chair"]"#;

/// Optional pieces of application state for a test app.
#[derive(Default)]
pub struct TestProviders {
    pub text: Option<Arc<dyn TextGenerator>>,
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub store: Option<Arc<dyn ObjectStore>>,
    pub publisher: Option<Arc<XPublisher>>,
}

impl TestProviders {
    /// Working text and image fakes, no storage, no publishing.
    pub fn generation() -> Self {
        Self {
            text: Some(FakeText::new(TWO_CONCEPTS)),
            images: Some(Arc::new(FakeImages::default())),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router with generation fakes.
///
/// Uses the same middleware stack as `main.rs` (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, TestProviders::generation())
}

/// Build the application router with explicit providers.
pub fn build_test_app_with(pool: PgPool, providers: TestProviders) -> Router {
    let config = test_config();

    let mut pipeline = MediaPipeline::new(pool.clone(), Arc::new(FakeArticles));
    if let Some(text) = providers.text {
        pipeline = pipeline.with_text(text);
    }
    if let Some(images) = providers.images {
        pipeline = pipeline.with_images(images);
    }

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        pipeline,
        store: providers.store,
        publisher: providers.publisher,
    };
    build_app_router(state, &config, None)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body).await
}

/// POST a multipart body with one file field.
pub async fn post_file(
    app: Router,
    uri: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
) -> Response {
    let boundary = "studio-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a persona through the API and return its id.
pub async fn create_persona(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/personas",
        serde_json::json!({"name": name, "description": format!("{name} paints harbors")}),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
