use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Client id/secret pair for the lightning data provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub stations_path: PathBuf,
    pub static_dir: PathBuf,
    /// `None` unless both the id and the secret are set.
    pub provider_credentials: Option<ProviderCredentials>,
    pub lightning_base_url: String,
    pub lines_query_url: Option<String>,
    pub request_timeout_secs: u64,
    pub max_concurrent_queries: usize,
    pub user_agent: String,
    pub default_minutes: u32,
    pub default_radius_km: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("stations_path", &self.stations_path)
            .field("static_dir", &self.static_dir)
            .field(
                "provider_credentials",
                &self.provider_credentials.as_ref().map(|_| "[redacted]"),
            )
            .field("lightning_base_url", &self.lightning_base_url)
            .field("lines_query_url", &self.lines_query_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_queries", &self.max_concurrent_queries)
            .field("user_agent", &self.user_agent)
            .field("default_minutes", &self.default_minutes)
            .field("default_radius_km", &self.default_radius_km)
            .finish()
    }
}
