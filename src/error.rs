use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised by a source collector while fetching listings or
/// enrichment data. A failing collector is logged and contributes zero
/// records to the cycle; it never aborts the loop.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {code} from {url}")]
    Status { code: u16, url: String },

    #[error("failed to parse response: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Errors raised while delivering a notification. Logged and dropped;
/// acceptance, dedup, and history state are never affected.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook returned status {code}")]
    Status { code: u16 },
}

/// Errors raised while writing the durable history snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write snapshot to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

pub type Result<T> = std::result::Result<T, Error>;
