//! rosdistro distribution feed parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::{Error, Result};

/// Scalar that may be written as a string, number or boolean in the feed
///
/// Unquoted numbers go through YAML number parsing, so their original text
/// is not kept: `version: 1.10` reads as "1.1". rosdistro quotes or suffixes
/// (`1.10.0-1`) its versions, which keeps them strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlexibleString(pub String);

impl<'de> Deserialize<'de> for FlexibleString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_yaml::Value::deserialize(deserializer)? {
            serde_yaml::Value::String(s) => Ok(FlexibleString(s)),
            serde_yaml::Value::Number(n) => Ok(FlexibleString(n.to_string())),
            serde_yaml::Value::Bool(b) => Ok(FlexibleString(b.to_string())),
            serde_yaml::Value::Null => Ok(FlexibleString(String::new())),
            other => Err(serde::de::Error::custom(format!(
                "expected a scalar, found {:?}",
                other
            ))),
        }
    }
}

impl FlexibleString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// `source` section of a repository entry
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SourceSection {
    #[serde(default)]
    pub url: Option<FlexibleString>,
}

/// `release` section of a repository entry
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ReleaseSection {
    #[serde(default)]
    pub url: Option<FlexibleString>,

    /// Release version including the distribution build suffix (e.g., "1.4.2-3")
    #[serde(default)]
    pub version: Option<FlexibleString>,

    /// Packages released from this repository
    #[serde(default)]
    pub packages: Option<Vec<FlexibleString>>,
}

/// One entry of the `repositories` mapping
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RepositoryDescriptor {
    #[serde(default)]
    pub source: Option<SourceSection>,

    #[serde(default)]
    pub release: Option<ReleaseSection>,
}

impl RepositoryDescriptor {
    /// Upstream source URL, preferring `source.url` over `release.url`
    pub fn source_url(&self) -> Option<&str> {
        let from_source = self
            .source
            .as_ref()
            .and_then(|s| s.url.as_ref())
            .map(FlexibleString::as_str)
            .filter(|url| !url.is_empty());
        let from_release = self
            .release
            .as_ref()
            .and_then(|r| r.url.as_ref())
            .map(FlexibleString::as_str)
            .filter(|url| !url.is_empty());

        from_source.or(from_release)
    }

    /// Release version with the build suffix stripped ("1.4.2-3" -> "1.4.2")
    pub fn release_version(&self) -> Option<String> {
        let raw = self.release.as_ref()?.version.as_ref()?.as_str();
        let version = raw.split('-').next().unwrap_or(raw);
        if version.is_empty() {
            None
        } else {
            Some(version.to_string())
        }
    }

    /// Packages contained in the repository, defaulting to the repository itself
    /// when the feed gives no list. An explicit empty list stays empty.
    pub fn package_names(&self, repository: &str) -> Vec<String> {
        match self.release.as_ref().and_then(|r| r.packages.as_ref()) {
            Some(packages) => packages.iter().map(|p| p.0.clone()).collect(),
            None => vec![repository.to_string()],
        }
    }
}

/// Parsed `distribution.yaml`
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionIndex {
    /// Repository entries in feed order
    pub repositories: IndexMap<String, RepositoryDescriptor>,
}

impl DistributionIndex {
    /// Parse a feed document
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::FeedMalformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_preserves_order() {
        let yaml = r#"
release_platforms:
  ubuntu: [bionic]
repositories:
  zeta:
    release:
      url: https://github.com/ros-gbp/zeta-release.git
      version: 0.1.0-0
  alpha:
    source:
      type: git
      url: https://github.com/ros/alpha.git
      version: melodic-devel
    status: maintained
type: distribution
version: 2
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        let keys: Vec<&String> = index.repositories.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_missing_repositories_is_malformed() {
        let err = DistributionIndex::from_yaml("type: distribution\n").unwrap_err();
        assert!(matches!(err, Error::FeedMalformed(_)));
    }

    #[test]
    fn test_non_mapping_is_malformed() {
        let err = DistributionIndex::from_yaml("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, Error::FeedMalformed(_)));
    }

    #[test]
    fn test_source_url_preference() {
        let yaml = r#"
repositories:
  both:
    source:
      url: https://github.com/org/both.git
    release:
      url: https://github.com/org-release/both-release.git
  release_only:
    release:
      url: https://github.com/org-release/release_only-release.git
  neither:
    doc:
      url: https://github.com/org/neither.git
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["both"].source_url(),
            Some("https://github.com/org/both.git")
        );
        assert_eq!(
            index.repositories["release_only"].source_url(),
            Some("https://github.com/org-release/release_only-release.git")
        );
        assert_eq!(index.repositories["neither"].source_url(), None);
    }

    #[test]
    fn test_empty_source_url_falls_back_to_release() {
        let yaml = r#"
repositories:
  blank_source:
    source:
      url: ""
    release:
      url: https://github.com/org-release/blank_source-release.git
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["blank_source"].source_url(),
            Some("https://github.com/org-release/blank_source-release.git")
        );
    }

    #[test]
    fn test_unquoted_float_version_loses_trailing_zero() {
        let yaml = r#"
repositories:
  floaty:
    release:
      version: 1.10
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["floaty"].release_version(),
            Some("1.1".to_string())
        );
    }

    #[test]
    fn test_release_version_truncation() {
        let yaml = r#"
repositories:
  tagged:
    release:
      version: 1.4.2-3
  plain:
    release:
      version: "2.0.0"
  untagged:
    release:
      url: https://github.com/org/untagged.git
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["tagged"].release_version(),
            Some("1.4.2".to_string())
        );
        assert_eq!(
            index.repositories["plain"].release_version(),
            Some("2.0.0".to_string())
        );
        assert_eq!(index.repositories["untagged"].release_version(), None);
    }

    #[test]
    fn test_numeric_scalars_are_read_as_strings() {
        let yaml = r#"
repositories:
  numeric:
    release:
      version: 2.1
      packages: [numeric]
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["numeric"].release_version(),
            Some("2.1".to_string())
        );
    }

    #[test]
    fn test_package_names_default_to_repository() {
        let yaml = r#"
repositories:
  multi:
    release:
      packages:
        - multi_core
        - multi_msgs
  single:
    release:
      version: 1.0.0-1
  empty:
    release:
      version: 1.0.0-0
      packages: []
"#;
        let index = DistributionIndex::from_yaml(yaml).unwrap();
        assert_eq!(
            index.repositories["multi"].package_names("multi"),
            vec!["multi_core", "multi_msgs"]
        );
        assert_eq!(
            index.repositories["single"].package_names("single"),
            vec!["single"]
        );
        assert!(index.repositories["empty"].package_names("empty").is_empty());
    }
}
