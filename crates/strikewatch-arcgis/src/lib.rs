pub mod bbox;
pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use bbox::BoundingBox;
pub use client::LinesClient;
pub use error::ArcgisError;
pub use normalize::{esri_to_geojson, is_feature_collection, LineCollection};
pub use types::{EsriFeature, EsriFeatureSet, Feature, FeatureCollection, LineString};
