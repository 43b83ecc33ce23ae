use crate::app_config::{AppConfig, Environment, ProviderCredentials};
use crate::ConfigError;

const DEFAULT_LIGHTNING_BASE_URL: &str = "https://data.api.xweather.com/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Kept separate from the real environment so tests can drive it from a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be a positive number, got {value}")))
        }
    };

    let env = parse_environment(&or_default("STRIKEWATCH_ENV", "development"));
    let bind_addr = parse_addr("STRIKEWATCH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STRIKEWATCH_LOG_LEVEL", "info");
    let stations_path = PathBuf::from(or_default(
        "STRIKEWATCH_STATIONS_PATH",
        "./config/stations.yaml",
    ));
    let static_dir = PathBuf::from(or_default("STRIKEWATCH_STATIC_DIR", "./public"));

    let provider_credentials = match (
        optional("XWEATHER_CLIENT_ID"),
        optional("XWEATHER_CLIENT_SECRET"),
    ) {
        (Some(client_id), Some(client_secret)) => Some(ProviderCredentials {
            client_id,
            client_secret,
        }),
        _ => None,
    };

    let lightning_base_url = or_default("STRIKEWATCH_LIGHTNING_BASE_URL", DEFAULT_LIGHTNING_BASE_URL);
    let lines_query_url = optional("STRIKEWATCH_LINES_QUERY_URL");

    let request_timeout_secs = parse_u64("STRIKEWATCH_REQUEST_TIMEOUT_SECS", "15")?;
    let max_concurrent_queries = parse_usize("STRIKEWATCH_MAX_CONCURRENT_QUERIES", "8")?.max(1);
    let user_agent = or_default(
        "STRIKEWATCH_USER_AGENT",
        "strikewatch/0.1 (lightning-proximity)",
    );

    let default_minutes = parse_u32("STRIKEWATCH_DEFAULT_MINUTES", "30")?;
    if default_minutes == 0 {
        return Err(invalid(
            "STRIKEWATCH_DEFAULT_MINUTES",
            "must be greater than zero".to_string(),
        ));
    }
    let default_radius_km = parse_positive_f64("STRIKEWATCH_DEFAULT_RADIUS_KM", "50")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        stations_path,
        static_dir,
        provider_credentials,
        lightning_base_url,
        lines_query_url,
        request_timeout_secs,
        max_concurrent_queries,
        user_agent,
        default_minutes,
        default_radius_km,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
