use std::path::PathBuf;

use secrecy::SecretString;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`, generation is slow).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// OpenAI responses endpoint credentials.
#[derive(Debug)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
}

/// fal.ai queue credentials.
#[derive(Debug)]
pub struct FalConfig {
    pub api_key: SecretString,
    pub queue_url: String,
}

/// Article reader endpoint. Works without a key at a lower rate limit.
#[derive(Debug)]
pub struct ReaderConfig {
    pub base_url: String,
    pub api_key: Option<SecretString>,
}

/// Where uploaded avatars and mirrored images go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    S3 {
        bucket: String,
        region: String,
        public_base_url: Option<String>,
    },
    /// A directory served by this process under [`LOCAL_FILES_ROUTE`].
    Local { dir: PathBuf, public_url: String },
    Disabled,
}

/// Route the local storage directory is served from.
pub const LOCAL_FILES_ROUTE: &str = "/files";

/// X (Twitter) user-context token.
#[derive(Debug)]
pub struct XConfig {
    pub access_token: SecretString,
    pub api_url: String,
}

/// Credentials and endpoints for every outbound integration.
///
/// A provider without credentials is `None`; the endpoints that need it
/// answer 503 while the rest of the API keeps working.
#[derive(Debug)]
pub struct ProviderConfig {
    pub openai: Option<OpenAiConfig>,
    pub fal: Option<FalConfig>,
    pub reader: ReaderConfig,
    pub storage: StorageConfig,
    /// Copy generated images into storage instead of keeping provider URLs.
    pub mirror_generated: bool,
    pub x: Option<XConfig>,
}

impl ProviderConfig {
    /// Load provider settings from environment variables.
    ///
    /// | Env Var               | Default                              |
    /// |-----------------------|--------------------------------------|
    /// | `OPENAI_API_KEY`      | unset (text generation disabled)     |
    /// | `OPENAI_BASE_URL`     | `https://api.openai.com`             |
    /// | `OPENAI_MODEL`        | `gpt-5-nano`                         |
    /// | `FAL_KEY`             | unset (image generation disabled)    |
    /// | `FAL_QUEUE_URL`       | `https://queue.fal.run`              |
    /// | `READER_URL`          | `https://r.jina.ai`                  |
    /// | `JINA_API_KEY`        | unset                                |
    /// | `STORAGE_BACKEND`     | `local` (`s3`, `local` or `none`)    |
    /// | `S3_BUCKET`           | required for `s3`                    |
    /// | `AWS_REGION`          | `us-east-1`                          |
    /// | `S3_PUBLIC_BASE_URL`  | unset (virtual-host S3 URLs)         |
    /// | `LOCAL_STORAGE_DIR`   | `./storage`                          |
    /// | `LOCAL_STORAGE_URL`   | `http://localhost:3000/files`        |
    /// | `MIRROR_GENERATED`    | `false`                              |
    /// | `X_USER_ACCESS_TOKEN` | unset (publishing disabled)          |
    /// | `X_API_URL`           | `https://api.x.com`                  |
    pub fn from_env() -> Self {
        let openai = secret_var("OPENAI_API_KEY").map(|api_key| OpenAiConfig {
            api_key,
            base_url: var_or("OPENAI_BASE_URL", studio_ai::openai::DEFAULT_API_URL),
            model: var_or("OPENAI_MODEL", studio_ai::openai::DEFAULT_MODEL),
        });

        let fal = secret_var("FAL_KEY").map(|api_key| FalConfig {
            api_key,
            queue_url: var_or("FAL_QUEUE_URL", studio_ai::fal::DEFAULT_QUEUE_URL),
        });

        let reader = ReaderConfig {
            base_url: var_or("READER_URL", studio_ai::reader::DEFAULT_READER_URL),
            api_key: secret_var("JINA_API_KEY"),
        };

        let storage = match var_or("STORAGE_BACKEND", "local").to_lowercase().as_str() {
            "s3" => StorageConfig::S3 {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when STORAGE_BACKEND=s3"),
                region: var_or("AWS_REGION", "us-east-1"),
                public_base_url: non_empty_var("S3_PUBLIC_BASE_URL"),
            },
            "local" => StorageConfig::Local {
                dir: PathBuf::from(var_or("LOCAL_STORAGE_DIR", "./storage")),
                public_url: var_or("LOCAL_STORAGE_URL", "http://localhost:3000/files"),
            },
            "none" => StorageConfig::Disabled,
            other => panic!("STORAGE_BACKEND must be one of s3, local, none (got '{other}')"),
        };

        let mirror_generated = var_or("MIRROR_GENERATED", "false")
            .parse()
            .expect("MIRROR_GENERATED must be true or false");

        let x = secret_var("X_USER_ACCESS_TOKEN").map(|access_token| XConfig {
            access_token,
            api_url: var_or("X_API_URL", studio_cloud::publish::DEFAULT_API_URL),
        });

        Self {
            openai,
            fal,
            reader,
            storage,
            mirror_generated,
            x,
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    non_empty_var(name).unwrap_or_else(|| default.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secret_var(name: &str) -> Option<SecretString> {
    non_empty_var(name).map(SecretString::from)
}
