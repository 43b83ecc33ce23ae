use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stations file {path}: {source}")]
    StationsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stations file: {0}")]
    StationsFileParse(#[from] serde_yaml::Error),

    #[error("stations validation failed: {0}")]
    Validation(String),
}
