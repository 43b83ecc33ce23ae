use thiserror::Error;

/// Errors returned by a single call to the lightning data provider.
#[derive(Debug, Error)]
pub enum LightningError {
    /// Client id or secret was not configured.
    #[error("lightning provider credentials are not configured")]
    MissingCredentials,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with `"success": false`.
    #[error("provider error ({code}): {description}")]
    Api { code: String, description: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Non-2xx status with a body that is not a provider envelope.
    #[error("unexpected HTTP status {status} from {path}")]
    UnexpectedStatus { status: u16, path: String },

    #[error("invalid provider base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl LightningError {
    /// Transport-level failures: the provider could not be reached or did not
    /// answer in time.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, LightningError::Http(_))
    }
}

/// Operation-level scan failures. Individual station failures never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan cannot run with the current configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The scan parameters are out of range.
    #[error("invalid scan request: {0}")]
    InvalidRequest(String),

    /// Every station query failed before the provider produced a response.
    #[error("all {failed} station queries failed to reach the provider: {message}")]
    Network { failed: usize, message: String },
}
