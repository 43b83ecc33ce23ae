//! HTTP client for the lightning strike provider.
//!
//! Wraps `reqwest` with provider-specific credential handling, envelope
//! checking and strike projection. The provider answers with a JSON envelope
//! even on most error statuses, so the body is parsed before the HTTP status
//! is considered.

use std::time::Duration;

use reqwest::{Client, Url};
use strikewatch_core::ProviderCredentials;

use crate::error::LightningError;
use crate::types::{RawStrike, StrikePoint, StrikesEnvelope};
use crate::window::ScanWindow;

pub const DEFAULT_BASE_URL: &str = "https://data.api.xweather.com/";

/// Maximum number of strikes requested per station query.
pub const STRIKE_LIMIT: u32 = 1000;

/// Parameters for one station-scoped strike query.
#[derive(Debug, Clone, Copy)]
pub struct StrikeQuery<'a> {
    pub lat: f64,
    pub lon: f64,
    pub radius_km: f64,
    pub window: &'a ScanWindow,
    /// When false the provider is asked for cloud-to-ground strikes only.
    pub include_ic: bool,
}

/// Client for the lightning provider's point-radius endpoint.
///
/// Use [`StrikeClient::new`] for production or [`StrikeClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct StrikeClient {
    client: Client,
    credentials: Option<ProviderCredentials>,
    base_url: Url,
}

impl StrikeClient {
    /// Creates a new client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`LightningError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        credentials: Option<ProviderCredentials>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, LightningError> {
        Self::with_base_url(credentials, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`LightningError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`LightningError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        credentials: Option<ProviderCredentials>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, LightningError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends below the base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| LightningError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Fetches the strikes around one point for the given window.
    ///
    /// # Errors
    ///
    /// - [`LightningError::MissingCredentials`] before any request when no
    ///   credentials are configured.
    /// - [`LightningError::Api`] if the provider reports `success: false`.
    /// - [`LightningError::Http`] on network failure or timeout.
    /// - [`LightningError::Deserialize`] / [`LightningError::UnexpectedStatus`]
    ///   if the body is not a provider envelope.
    pub async fn fetch_strikes(
        &self,
        query: &StrikeQuery<'_>,
    ) -> Result<Vec<StrikePoint>, LightningError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(LightningError::MissingCredentials)?;
        let url = self.build_url(credentials, query)?;
        let context = format!("lightning({},{})", query.lat, query.lon);

        let body = self.request_json(&url, &context).await?;
        let envelope: StrikesEnvelope =
            serde_json::from_value(body).map_err(|e| LightningError::Deserialize {
                context: context.clone(),
                source: e,
            })?;

        if !envelope.success {
            let detail = envelope.error.unwrap_or_default();
            return Err(LightningError::Api {
                code: detail.code.unwrap_or_else(|| "unknown".to_string()),
                description: detail
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let total = envelope.response.len();
        let strikes: Vec<StrikePoint> = envelope
            .response
            .into_iter()
            .filter_map(|v| serde_json::from_value::<RawStrike>(v).ok())
            .map(StrikePoint::from)
            .collect();

        if strikes.len() < total {
            tracing::debug!(
                context = %context,
                skipped = total - strikes.len(),
                "skipped malformed strike records"
            );
        }

        Ok(strikes)
    }

    /// Builds `lightning/{lat},{lon}` with the query string the provider expects.
    fn build_url(
        &self,
        credentials: &ProviderCredentials,
        query: &StrikeQuery<'_>,
    ) -> Result<Url, LightningError> {
        let mut url = self
            .base_url
            .join(&format!("lightning/{},{}", query.lat, query.lon))
            .map_err(|e| LightningError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            pairs.append_pair("radius", &format!("{}km", query.radius_km));
            pairs.append_pair("limit", &STRIKE_LIMIT.to_string());
            pairs.append_pair("from", &query.window.from_param());
            pairs.append_pair("to", &query.window.to_param());
            pairs.append_pair("client_id", &credentials.client_id);
            pairs.append_pair("client_secret", &credentials.client_secret);
            if !query.include_ic {
                pairs.append_pair("filter", "cg");
            }
        }
        Ok(url)
    }

    /// Sends a GET request and parses the body as JSON.
    ///
    /// A non-JSON body on a 2xx status is a [`LightningError::Deserialize`];
    /// on any other status it is a [`LightningError::UnexpectedStatus`].
    /// `context` is used in errors instead of the URL, which carries the secret.
    async fn request_json(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<serde_json::Value, LightningError> {
        // The query string carries the client secret; strip it from errors.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(LightningError::Deserialize {
                context: context.to_string(),
                source: e,
            }),
            Err(_) => Err(LightningError::UnexpectedStatus {
                status: status.as_u16(),
                path: url.path().to_string(),
            }),
        }
    }
}
