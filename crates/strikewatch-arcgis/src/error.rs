use thiserror::Error;

/// Errors returned by the mapping-service line fetch.
#[derive(Debug, Error)]
pub enum ArcgisError {
    /// A bounding-box field was not supplied.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A bounding-box field is not a finite number.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// No mapping-service endpoint is configured.
    #[error("lines query URL is not configured")]
    NotConfigured,

    #[error("invalid lines query URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Network failure or non-2xx status from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with an `{"error": {...}}` body.
    #[error("ArcGIS error {code}: {message}")]
    Api { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ArcgisError {
    /// True for errors caused by the caller's parameters rather than the service.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ArcgisError::MissingParameter(_) | ArcgisError::InvalidParameter { .. }
        )
    }
}
