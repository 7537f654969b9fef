//! aurci: Keeps ROS PKGBUILD recipes in sync with rosdistro releases
//!
//! This crate provides:
//! - Field extraction and line-anchored rewriting of PKGBUILD files
//! - Release archive download and SHA-256 checksumming
//! - `.SRCINFO` regeneration through `makepkg`
//! - The per-package update state machine

pub mod checksum;
pub mod config;
pub mod download;
pub mod error;
pub mod pkgbuild;
pub mod srcinfo;
pub mod updater;

pub use config::Config;
pub use download::{Downloader, HttpDownloader};
pub use error::{Error, Result};
pub use pkgbuild::{Pkgbuild, RecipeFields};
pub use srcinfo::{MakepkgSrcinfo, SrcinfoGenerator};
pub use updater::{UpdateOutcome, Updater};
