//! Resolver configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_DISTRO: &str = "melodic";

const ROSDISTRO_BASE: &str = "https://raw.githubusercontent.com/ros/rosdistro/master";

/// Run parameters for the metadata resolver
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// ROS distribution name (e.g., "melodic", "noetic")
    #[serde(default = "default_distro")]
    pub distro: String,

    /// Explicit feed location, derived from `distro` when unset
    #[serde(default)]
    pub feed_url: Option<String>,

    /// Prefix for package names, derived from `distro` when unset
    #[serde(default)]
    pub package_prefix: Option<String>,

    /// GitHub token, raises the rate limit on raw.githubusercontent.com
    #[serde(default, skip_serializing)]
    pub github_token: Option<String>,
}

fn default_distro() -> String {
    DEFAULT_DISTRO.to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            distro: default_distro(),
            feed_url: None,
            package_prefix: None,
            github_token: None,
        }
    }
}

impl ResolverConfig {
    pub fn for_distro(distro: &str) -> Self {
        Self {
            distro: distro.to_string(),
            ..Self::default()
        }
    }

    /// Location of the distribution feed
    pub fn feed_url(&self) -> String {
        match &self.feed_url {
            Some(url) => url.clone(),
            None => format!("{}/{}/distribution.yaml", ROSDISTRO_BASE, self.distro),
        }
    }

    /// Prefix prepended to every normalized package name
    pub fn package_prefix(&self) -> String {
        match &self.package_prefix {
            Some(prefix) => prefix.clone(),
            None => format!("ros-{}-", self.distro),
        }
    }
}
