pub mod client;
pub mod dedup;
pub mod error;
pub mod geo;
pub mod scan;
pub mod types;
pub mod window;

pub use client::{StrikeClient, StrikeQuery};
pub use dedup::dedup_points;
pub use error::{LightningError, ScanError};
pub use geo::{haversine_km, nearest_km, EARTH_RADIUS_KM};
pub use scan::{ScanOrchestrator, ScanRequest, ScanResult, StationError, StationResult};
pub use types::{Polarity, StrikePoint, StrikeType};
pub use window::ScanWindow;
