//! HTTP client for an ArcGIS feature layer `query` endpoint.
//!
//! Lines are requested as GeoJSON first. When that call fails or returns
//! something other than a FeatureCollection, the same query is repeated with
//! `f=json` and the ESRI feature set is converted.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::bbox::BoundingBox;
use crate::error::ArcgisError;
use crate::normalize::{esri_to_geojson, is_feature_collection, LineCollection};
use crate::types::EsriFeatureSet;

/// Output formats the query endpoint is asked for.
const FORMAT_GEOJSON: &str = "geojson";
const FORMAT_ESRI_JSON: &str = "json";

#[derive(Clone)]
pub struct LinesClient {
    client: Client,
    query_url: Url,
}

impl LinesClient {
    /// Creates a client for the given layer `query` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ArcgisError::InvalidUrl`] if `query_url` does not parse, or
    /// [`ArcgisError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(query_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ArcgisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let query_url = Url::parse(query_url).map_err(|e| ArcgisError::InvalidUrl {
            url: query_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, query_url })
    }

    /// Fetches the line features intersecting `bbox` as a GeoJSON FeatureCollection.
    ///
    /// # Errors
    ///
    /// Returns the fallback call's error when the GeoJSON attempt was unusable
    /// and the ESRI-JSON attempt failed too: [`ArcgisError::Http`],
    /// [`ArcgisError::Api`] or [`ArcgisError::Deserialize`].
    pub async fn fetch_lines(&self, bbox: &BoundingBox) -> Result<LineCollection, ArcgisError> {
        match self.query(bbox, FORMAT_GEOJSON).await {
            Ok(body) if is_feature_collection(&body) => {
                return Ok(LineCollection::GeoJson(body));
            }
            Ok(_) => {
                tracing::debug!("GeoJSON response is not a FeatureCollection; falling back to ESRI JSON");
            }
            Err(e) => {
                tracing::debug!(error = %e, "GeoJSON query failed; falling back to ESRI JSON");
            }
        }

        let body = self.query(bbox, FORMAT_ESRI_JSON).await?;
        let set: EsriFeatureSet =
            serde_json::from_value(body).map_err(|e| ArcgisError::Deserialize {
                context: format!("{} (f=json)", self.query_url.path()),
                source: e,
            })?;

        if let Some(err) = set.error {
            return Err(ArcgisError::Api {
                code: err.code,
                message: err.message,
            });
        }

        Ok(LineCollection::EsriJson(esri_to_geojson(set)))
    }

    fn build_url(&self, bbox: &BoundingBox, format: &str) -> Url {
        let mut url = self.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("where", "1=1");
            pairs.append_pair("geometry", &bbox.to_envelope_param());
            pairs.append_pair("geometryType", "esriGeometryEnvelope");
            pairs.append_pair("inSR", "4326");
            pairs.append_pair("spatialRel", "esriSpatialRelIntersects");
            pairs.append_pair("outFields", "*");
            pairs.append_pair("returnGeometry", "true");
            pairs.append_pair("f", format);
        }
        url
    }

    /// Sends the query, asserts a 2xx status, and parses the body as JSON.
    async fn query(
        &self,
        bbox: &BoundingBox,
        format: &str,
    ) -> Result<serde_json::Value, ArcgisError> {
        let url = self.build_url(bbox, format);
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ArcgisError::Deserialize {
            context: format!("{} (f={format})", self.query_url.path()),
            source: e,
        })
    }
}
