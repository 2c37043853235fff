/// Errors from the provider client layer.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered with a body we could not interpret.
    #[error("Unexpected {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// A queued job or fetch did not finish in time.
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The provider succeeded but produced nothing usable.
    #[error("{0} returned no result")]
    EmptyResult(&'static str),

    /// A URL failed validation before any request was made.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A response body exceeded the configured size cap.
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
}

impl AiError {
    /// Transient failures worth retrying: network errors, timeouts, 429 and 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Request(_) | AiError::Timeout(_) => true,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            AiError::Decode { .. }
            | AiError::EmptyResult(_)
            | AiError::InvalidUrl(_)
            | AiError::ResponseTooLarge(_) => false,
        }
    }
}
