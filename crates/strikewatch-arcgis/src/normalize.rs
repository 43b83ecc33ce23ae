//! Normalisation of the two mapping-service response shapes into GeoJSON.

use serde::Serialize;
use serde_json::Value;

use crate::types::{EsriFeatureSet, Feature, FeatureCollection};

/// A line FeatureCollection and the shape it was obtained from.
///
/// Serializes as the bare collection in both cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineCollection {
    /// The service's own GeoJSON body, passed through untouched.
    GeoJson(Value),
    /// Built from an ESRI-JSON feature set.
    EsriJson(FeatureCollection),
}

impl LineCollection {
    /// Number of features in the collection, whichever shape it came from.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self {
            LineCollection::GeoJson(body) => body
                .get("features")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
            LineCollection::EsriJson(collection) => collection.features.len(),
        }
    }
}

/// True when `body` already looks like a GeoJSON FeatureCollection.
#[must_use]
pub fn is_feature_collection(body: &Value) -> bool {
    body.get("type").and_then(Value::as_str) == Some("FeatureCollection")
        || body.get("features").is_some()
}

/// Convert an ESRI feature set to GeoJSON `LineString` features.
///
/// Only the first path of each polyline is kept; multi-part lines lose their
/// later parts. Features without geometry get an empty coordinate list.
/// Coordinates and attributes are copied unchanged.
#[must_use]
pub fn esri_to_geojson(set: EsriFeatureSet) -> FeatureCollection {
    let features = set
        .features
        .into_iter()
        .map(|feature| {
            let coordinates = feature
                .geometry
                .and_then(|g| g.paths.into_iter().next())
                .unwrap_or_default();
            Feature::line(coordinates, feature.attributes.unwrap_or_default())
        })
        .collect();

    FeatureCollection::new(features)
}
