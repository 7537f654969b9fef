use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Distribution feed unavailable ({url}): {reason}")]
    FeedUnavailable { url: String, reason: String },

    #[error("Distribution feed malformed: {0}")]
    FeedMalformed(String),

    #[error("Unknown package: {0}")]
    UnknownPackage(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
