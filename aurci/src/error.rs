use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Meta(#[from] aurci_meta::Error),

    #[error("PKGBUILD of {package} is missing field(s): {}", .missing.join(", "))]
    RecipeMalformed {
        package: String,
        missing: Vec<&'static str>,
    },

    #[error("Download failed for {package} ({url}): {reason}")]
    DownloadFailed {
        package: String,
        url: String,
        reason: String,
    },

    #[error("Failed to generate .SRCINFO: {0}")]
    Srcinfo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
