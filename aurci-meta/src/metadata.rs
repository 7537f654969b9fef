//! Package metadata resolution
//!
//! Turns a distribution feed into one record per released package:
//! - package name normalization and prefixing
//! - sibling counting for multi-package repositories
//! - release archive location for recognized source hosts

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::FeedClient;
use crate::config::ResolverConfig;
use crate::distro::DistributionIndex;
use crate::host::SourceHost;
use crate::{Error, Result};

/// Resolved metadata keyed by normalized package name
pub type PackageIndex = IndexMap<String, PackageMetadata>;

/// Metadata for a single released package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Normalized, prefixed name (e.g., "ros-melodic-foo-a")
    pub package_name: String,

    /// Name as listed in the feed (e.g., "foo_a")
    pub upstream_name: String,

    /// Owning repository identifier
    pub repository: String,

    /// Number of other packages released from the same repository
    pub siblings: usize,

    pub source_url: String,

    /// Release version without the build suffix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Release archive, known only for recognized hosts with a version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl PackageMetadata {
    pub fn has_siblings(&self) -> bool {
        self.siblings > 0
    }
}

/// Normalize a raw package name: "foo_bar" -> "<prefix>foo-bar"
pub fn normalize_name(prefix: &str, raw: &str) -> String {
    format!("{}{}", prefix, raw.replace('_', "-"))
}

/// Derive per-package metadata from a parsed feed
pub fn build_metadata(index: &DistributionIndex, prefix: &str) -> PackageIndex {
    let mut packages = PackageIndex::new();

    for (repository, descriptor) in &index.repositories {
        let Some(source_url) = descriptor.source_url() else {
            warn!("Skipping {}: no source or release url", repository);
            continue;
        };

        let host = SourceHost::from_url(source_url);
        let version = descriptor.release_version();
        let download_url = version.as_deref().and_then(|v| host.archive_url(v));

        let names = descriptor.package_names(repository);
        if names.is_empty() {
            debug!("Skipping {}: empty package list", repository);
            continue;
        }
        let siblings = names.len() - 1;

        for raw in names {
            let package_name = normalize_name(prefix, &raw);
            debug!("{} -> {} ({:?})", repository, package_name, version);

            let metadata = PackageMetadata {
                package_name: package_name.clone(),
                upstream_name: raw,
                repository: repository.clone(),
                siblings,
                source_url: source_url.to_string(),
                version: version.clone(),
                download_url: download_url.clone(),
            };
            packages.insert(package_name, metadata);
        }
    }

    packages
}

/// Fetches the distribution feed and resolves package metadata
pub struct MetadataResolver {
    config: ResolverConfig,
    client: FeedClient,
}

impl MetadataResolver {
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let client = FeedClient::new(config.github_token.clone())?;
        Ok(Self { config, client })
    }

    /// Fetch the feed and map every released package to its metadata
    pub fn resolve(&self) -> Result<PackageIndex> {
        let url = self.config.feed_url();
        info!("Fetching distribution feed {}", url);

        let content = self.client.fetch(&url)?;
        let index = DistributionIndex::from_yaml(&content)?;
        let packages = build_metadata(&index, &self.config.package_prefix());

        info!(
            "Resolved {} packages from {} repositories",
            packages.len(),
            index.repositories.len()
        );
        Ok(packages)
    }
}

/// Look up a package, failing with `UnknownPackage` when absent
pub fn lookup<'a>(packages: &'a PackageIndex, name: &str) -> Result<&'a PackageMetadata> {
    packages
        .get(name)
        .ok_or_else(|| Error::UnknownPackage(name.to_string()))
}
