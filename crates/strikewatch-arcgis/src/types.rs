//! ESRI-JSON input types and GeoJSON output types for line features.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// ESRI JSON (`f=json`)
// ---------------------------------------------------------------------------

/// Feature set returned by an ArcGIS `query` with `f=json`.
#[derive(Debug, Deserialize)]
pub struct EsriFeatureSet {
    #[serde(default)]
    pub features: Vec<EsriFeature>,
    #[serde(default)]
    pub error: Option<EsriErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct EsriFeature {
    #[serde(default)]
    pub geometry: Option<EsriPolyline>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

/// Polyline geometry: one coordinate list per part.
///
/// Positions stay raw JSON so Z/M members (which may be `null`) are copied
/// through unchanged.
#[derive(Debug, Deserialize)]
pub struct EsriPolyline {
    #[serde(default)]
    pub paths: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct EsriErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// GeoJSON output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: LineString,
    pub properties: Map<String, Value>,
}

impl Feature {
    #[must_use]
    pub fn line(coordinates: Vec<Value>, properties: Map<String, Value>) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: LineString::new(coordinates),
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Value>,
}

impl LineString {
    #[must_use]
    pub fn new(coordinates: Vec<Value>) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates,
        }
    }
}
