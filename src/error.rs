use std::path::PathBuf;

/// Failures of the explanation lookup. All of them end in the same user-facing
/// Failed state; the detail only reaches the log.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Failures while loading the document to read.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("backend answered {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("paper {0} not found")]
    NotFound(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
