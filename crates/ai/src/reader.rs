//! Article text extraction through a Jina-style reader service.
//!
//! The reader is called as `GET {base}/{article_url}` and answers with a
//! plain-text rendering:
//!
//! ```text
//! Title: Some headline
//!
//! URL Source: https://example.com/post
//!
//! Markdown Content:
//! ...body...
//! ```

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use secrecy::{ExposeSecret, SecretString};

use crate::error::AiError;
use crate::provider::{ArticleSource, FetchedArticle};
use crate::validate::validate_public_url;

/// Public reader endpoint.
pub const DEFAULT_READER_URL: &str = "https://r.jina.ai";

/// Largest body accepted from the reader (5 MiB).
pub const MAX_CONTENT_SIZE: usize = 5 * 1024 * 1024;

/// Per-attempt request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Retries after the first attempt for transient failures.
pub const MAX_RETRIES: u32 = 3;

const PROVIDER: &str = "Reader";
const CONTENT_MARKER: &str = "Markdown Content:";

/// Fetches article text for a public link.
pub struct ReaderClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    retry_base: Duration,
}

impl ReaderClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// Plain HTTP base URLs are only allowed for localhost, and the API key
    /// is only sent to HTTPS endpoints.
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            retry_base: Duration::from_secs(1),
        }
    }

    /// Base delay for exponential backoff (doubles per retry).
    pub fn with_retry_base(mut self, retry_base: Duration) -> Self {
        self.retry_base = retry_base;
        self
    }

    /// Fetch and parse the article at `url`.
    pub async fn fetch_article(&self, url: &str) -> Result<FetchedArticle, AiError> {
        let parsed = validate_public_url(url)?;
        self.check_base_url()?;

        let reader_url = format!("{}/{}", self.base_url, parsed.as_str());
        let raw = self.fetch_with_retry(&reader_url).await?;
        let (title, text) = split_reader_output(&raw);
        if text.is_empty() {
            return Err(AiError::EmptyResult(PROVIDER));
        }

        tracing::debug!(url = %parsed, chars = text.len(), "Fetched article text");
        Ok(FetchedArticle {
            url: parsed.to_string(),
            title,
            text,
        })
    }

    fn check_base_url(&self) -> Result<(), AiError> {
        let base = self.base_url.as_str();
        if base.starts_with("https://")
            || base.starts_with("http://127.0.0.1")
            || base.starts_with("http://localhost")
        {
            return Ok(());
        }
        tracing::error!(base_url = %base, "Rejecting non-HTTPS reader base URL");
        Err(AiError::InvalidUrl(format!(
            "reader base URL must use HTTPS: {base}"
        )))
    }

    async fn fetch_with_retry(&self, reader_url: &str) -> Result<String, AiError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(reader_url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_retryable() && attempt < MAX_RETRIES => {
                    let delay = self.retry_base * (1u32 << attempt);
                    tracing::debug!(
                        error = %e,
                        retry = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying reader fetch after transient error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, reader_url: &str) -> Result<String, AiError> {
        let mut request = self.client.get(reader_url).header("Accept", "text/plain");
        if let Some(key) = &self.api_key {
            if reader_url.starts_with("https://") {
                request = request.bearer_auth(key.expose_secret());
            }
        }

        let response = tokio::time::timeout(REQUEST_TIMEOUT, request.send())
            .await
            .map_err(|_| AiError::Timeout("Reader fetch"))??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        read_limited_text(response, MAX_CONTENT_SIZE).await
    }
}

#[async_trait]
impl ArticleSource for ReaderClient {
    async fn fetch(&self, url: &str) -> Result<FetchedArticle, AiError> {
        self.fetch_article(url).await
    }
}

/// Split reader output into `(title, body)`.
///
/// Output without the reader header is returned whole as the body.
fn split_reader_output(raw: &str) -> (Option<String>, String) {
    let title = raw
        .lines()
        .take_while(|l| !l.starts_with(CONTENT_MARKER))
        .find_map(|l| l.strip_prefix("Title:"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let body = match raw.find(CONTENT_MARKER) {
        Some(idx) => &raw[idx + CONTENT_MARKER.len()..],
        None => raw,
    };
    (title, body.trim().to_string())
}

async fn read_limited_text(response: reqwest::Response, limit: usize) -> Result<String, AiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(AiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(AiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| AiError::Decode {
        provider: PROVIDER,
        message: "response is not valid UTF-8".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ReaderClient {
        ReaderClient::with_client(reqwest::Client::new(), server.uri(), None)
            .with_retry_base(Duration::from_millis(1))
    }

    const READER_BODY: &str = "Title: Tides of Change\n\nURL Source: https://example.com/tides\n\n\
                               Markdown Content:\nThe sea rose.\n\nThen it fell.\n";

    #[tokio::test]
    async fn fetch_parses_title_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex("example.com/tides$"))
            .respond_with(ResponseTemplate::new(200).set_body_string(READER_BODY))
            .mount(&server)
            .await;

        let article = client_for(&server)
            .fetch_article("https://example.com/tides")
            .await
            .unwrap();
        assert_eq!(article.title.as_deref(), Some("Tides of Change"));
        assert_eq!(article.text, "The sea rose.\n\nThen it fell.");
        assert_eq!(article.url, "https://example.com/tides");
    }

    #[tokio::test]
    async fn private_links_are_rejected_before_fetching() {
        let server = MockServer::start().await;
        let err = client_for(&server)
            .fetch_article("http://192.168.0.10/admin")
            .await
            .unwrap_err();
        assert_matches!(err, AiError::InvalidUrl(_));
    }

    #[tokio::test]
    async fn insecure_remote_base_is_rejected() {
        let client = ReaderClient::with_client(
            reqwest::Client::new(),
            "http://reader.example.com".into(),
            None,
        );
        let err = client
            .fetch_article("https://example.com/a")
            .await
            .unwrap_err();
        assert_matches!(err, AiError::InvalidUrl(_));
    }

    #[tokio::test]
    async fn server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Plain body"))
            .mount(&server)
            .await;

        let article = client_for(&server)
            .fetch_article("https://example.com/a")
            .await
            .unwrap();
        assert_eq!(article.text, "Plain body");
        assert!(article.title.is_none());
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_article("https://example.com/a")
            .await
            .unwrap_err();
        assert_matches!(err, AiError::Api { status: 404, .. });
    }

    #[tokio::test]
    async fn blank_body_is_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Title: x\nMarkdown Content:\n  \n"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_article("https://example.com/a")
            .await
            .unwrap_err();
        assert_matches!(err, AiError::EmptyResult(_));
    }

    #[test]
    fn split_without_header_keeps_everything() {
        let (title, body) = split_reader_output("  just text  ");
        assert!(title.is_none());
        assert_eq!(body, "just text");
    }
}
