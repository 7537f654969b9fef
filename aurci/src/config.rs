//! Run configuration
//!
//! Loaded from an optional YAML file; command-line flags override it.
//!
//! ```yaml
//! distro: melodic
//! packages_root: ./packages
//! skip:
//!   - fcl
//!   - opencv3
//! ```

use std::path::{Path, PathBuf};

use aurci_meta::{PackageMetadata, ResolverConfig};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(flatten)]
    pub resolver: ResolverConfig,

    /// Directory holding one subdirectory per package
    #[serde(default = "default_packages_root")]
    pub packages_root: PathBuf,

    /// Upstream packages left alone by batch updates
    #[serde(default)]
    pub skip: Vec<String>,
}

fn default_packages_root() -> PathBuf {
    PathBuf::from("packages")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            packages_root: default_packages_root(),
            skip: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(Error::Yaml)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Whether the skip list names this package, by upstream or normalized name
    pub fn is_skipped(&self, metadata: &PackageMetadata) -> bool {
        self.skip
            .iter()
            .any(|s| *s == metadata.upstream_name || *s == metadata.package_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(upstream: &str) -> PackageMetadata {
        PackageMetadata {
            package_name: format!("ros-melodic-{}", upstream.replace('_', "-")),
            upstream_name: upstream.to_string(),
            repository: upstream.to_string(),
            siblings: 0,
            source_url: format!("https://github.com/org/{}.git", upstream),
            version: Some("1.0.0".to_string()),
            download_url: None,
        }
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
distro: noetic
packages_root: /srv/aur/packages
skip:
  - fcl
  - ros-noetic-stage
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.resolver.distro, "noetic");
        assert_eq!(config.resolver.package_prefix(), "ros-noetic-");
        assert_eq!(config.packages_root, PathBuf::from("/srv/aur/packages"));
        assert!(config.is_skipped(&metadata("fcl")));
        assert!(!config.is_skipped(&metadata("stage")));

        let mut stage = metadata("stage");
        stage.package_name = "ros-noetic-stage".to_string();
        assert!(config.is_skipped(&stage));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.resolver.distro, "melodic");
        assert_eq!(config.packages_root, PathBuf::from("packages"));
        assert!(config.skip.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("aurci.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
