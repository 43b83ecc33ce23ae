pub mod app_config;
pub mod config;
pub mod error;
pub mod stations;

pub use app_config::{AppConfig, Environment, ProviderCredentials};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use stations::{load_stations, parse_stations, Station, StationsFile};
