//! Construction of provider clients from [`ProviderConfig`].

use std::sync::Arc;
use std::time::Duration;

use studio_ai::{FalClient, OpenAiClient, ReaderClient};
use studio_cloud::{LocalStore, ObjectStore, S3Store, XPublisher};
use studio_db::DbPool;
use studio_pipeline::MediaPipeline;

use crate::config::{ProviderConfig, StorageConfig};

/// Per-request timeout for outbound provider calls. fal.ai polling has
/// its own deadline on top of this.
pub const PROVIDER_HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything handlers need besides the pool and server config.
pub struct Providers {
    pub pipeline: MediaPipeline,
    pub store: Option<Arc<dyn ObjectStore>>,
    pub publisher: Option<Arc<XPublisher>>,
}

/// Build provider clients. Providers without credentials are left out and
/// logged once here.
pub async fn build_providers(
    pool: DbPool,
    config: ProviderConfig,
) -> Result<Providers, reqwest::Error> {
    let http = reqwest::Client::builder()
        .timeout(PROVIDER_HTTP_TIMEOUT)
        .build()?;

    let reader = ReaderClient::with_client(
        http.clone(),
        config.reader.base_url,
        config.reader.api_key,
    );
    let mut pipeline = MediaPipeline::new(pool, Arc::new(reader));

    match config.openai {
        Some(openai) => {
            tracing::info!(model = %openai.model, "Text generation enabled");
            pipeline = pipeline.with_text(Arc::new(OpenAiClient::with_client(
                http.clone(),
                openai.base_url,
                openai.api_key,
                openai.model,
            )));
        }
        None => tracing::warn!("OPENAI_API_KEY not set, text generation disabled"),
    }

    match config.fal {
        Some(fal) => {
            tracing::info!("Image generation enabled");
            pipeline = pipeline.with_images(Arc::new(FalClient::with_client(
                http.clone(),
                fal.queue_url,
                fal.api_key,
            )));
        }
        None => tracing::warn!("FAL_KEY not set, image generation disabled"),
    }

    let store = build_store(&config.storage).await;
    if config.mirror_generated {
        match &store {
            Some(store) => {
                tracing::info!(backend = store.backend_name(), "Mirroring generated images");
                pipeline = pipeline.with_mirror(Arc::clone(store), http.clone());
            }
            None => tracing::warn!("MIRROR_GENERATED set but storage is disabled, ignoring"),
        }
    }

    let publisher = config.x.map(|x| {
        tracing::info!("Publishing to X enabled");
        Arc::new(XPublisher::with_client(http.clone(), x.api_url, x.access_token))
    });

    Ok(Providers {
        pipeline,
        store,
        publisher,
    })
}

async fn build_store(config: &StorageConfig) -> Option<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::S3 {
            bucket,
            region,
            public_base_url,
        } => {
            tracing::info!(%bucket, %region, "Using S3 object storage");
            let store =
                S3Store::from_env(bucket.clone(), region.clone(), public_base_url.clone()).await;
            Some(Arc::new(store))
        }
        StorageConfig::Local { dir, public_url } => {
            tracing::info!(dir = %dir.display(), %public_url, "Using local object storage");
            Some(Arc::new(LocalStore::new(dir.clone(), public_url)))
        }
        StorageConfig::Disabled => {
            tracing::warn!("Object storage disabled, avatar uploads unavailable");
            None
        }
    }
}
