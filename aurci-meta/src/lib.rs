//! aurci-meta: Package metadata resolver for rosdistro feeds
//!
//! This crate provides tools for:
//! - Fetching a rosdistro `distribution.yaml` feed
//! - Recognizing the hosting service of upstream source URLs
//! - Deriving one metadata record per released package

pub mod client;
pub mod config;
pub mod distro;
pub mod error;
pub mod host;
pub mod metadata;

#[cfg(test)]
mod test_utils;

pub use client::FeedClient;
pub use config::ResolverConfig;
pub use distro::{DistributionIndex, RepositoryDescriptor};
pub use error::{Error, Result};
pub use host::SourceHost;
pub use metadata::{build_metadata, lookup, MetadataResolver, PackageIndex, PackageMetadata};
