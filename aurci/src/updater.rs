//! Per-package recipe update
//!
//! An update either finishes with the recipe fully rewritten or leaves it
//! byte-for-byte as it was. The archive is fetched into a scoped temporary
//! directory that is removed on every exit path.

use std::{
    fmt::Display,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use aurci_meta::{metadata::lookup, PackageIndex, PackageMetadata};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    checksum::sha256sum,
    download::Downloader,
    pkgbuild::{
        dir_field, pkgver_field, sha256sums_field, source_field, Pkgbuild, RecipeFields,
        RECIPE_FILE,
    },
    srcinfo::{SrcinfoGenerator, SRCINFO_FILE},
    Error, Result,
};

/// Successful result of an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The feed has no release version for the package
    NoVersionAvailable,
    /// The recipe already describes the released version
    AlreadyCurrent,
    /// The recipe was rewritten and `.SRCINFO` regenerated
    Updated { version: String, checksum: String },
}

impl Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateOutcome::NoVersionAvailable => write!(f, "no release version"),
            UpdateOutcome::AlreadyCurrent => write!(f, "already current"),
            UpdateOutcome::Updated { version, .. } => write!(f, "updated to {}", version),
        }
    }
}

pub struct Updater<D, G> {
    packages_root: PathBuf,
    downloader: D,
    generator: G,
}

impl<D: Downloader, G: SrcinfoGenerator> Updater<D, G> {
    pub fn new<P: Into<PathBuf>>(packages_root: P, downloader: D, generator: G) -> Self {
        Self {
            packages_root: packages_root.into(),
            downloader,
            generator,
        }
    }

    /// Look the package up in the resolved index and update it
    pub fn update_package(&self, packages: &PackageIndex, package: &str) -> Result<UpdateOutcome> {
        let metadata = lookup(packages, package)?;
        self.update(package, metadata)
    }

    /// Bring the recipe of `package` in line with its release metadata
    pub fn update(&self, package: &str, metadata: &PackageMetadata) -> Result<UpdateOutcome> {
        let Some(version) = metadata.version.as_deref() else {
            info!("{}: no release version in distribution feed", package);
            return Ok(UpdateOutcome::NoVersionAvailable);
        };

        let package_dir = self.packages_root.join(package);
        let recipe_path = package_dir.join(RECIPE_FILE);
        let content = fs::read_to_string(&recipe_path)?;
        let pkgbuild = Pkgbuild::parse(package, &content)?;
        let current = pkgbuild.fields();

        let Some(url) = metadata.download_url.as_deref() else {
            return Err(Error::DownloadFailed {
                package: package.to_string(),
                url: metadata.source_url.clone(),
                reason: "no release archive known for this source host".to_string(),
            });
        };

        let mut target = RecipeFields {
            pkgver: pkgver_field(version),
            dir: dir_field(metadata),
            source: source_field(url),
            sha256sums: current.sha256sums.clone(),
        };
        debug!("{}: {} {} {}", package, target.pkgver, target.dir, target.source);

        if current.matches_release(&target) {
            info!("{}: already matches {}", package, version);
            return Ok(UpdateOutcome::AlreadyCurrent);
        }

        info!("{}: updating to {}", package, version);
        let checksum = self.archive_checksum(package, version, url)?;
        target.sha256sums = sha256sums_field(&checksum);

        write_atomic(&recipe_path, &pkgbuild.rewrite(&target))?;

        let srcinfo = self.generator.generate(&package_dir)?;
        write_atomic(&package_dir.join(SRCINFO_FILE), &srcinfo)?;

        Ok(UpdateOutcome::Updated {
            version: version.to_string(),
            checksum,
        })
    }

    fn archive_checksum(&self, package: &str, version: &str, url: &str) -> Result<String> {
        let workdir = tempfile::Builder::new()
            .prefix("aurci-")
            .rand_bytes(8)
            .tempdir()?;
        let archive = workdir.path().join(format!("{}-{}.tar.gz", package, version));

        self.downloader
            .download(url, &archive)
            .map_err(|reason| Error::DownloadFailed {
                package: package.to_string(),
                url: url.to_string(),
                reason,
            })?;

        let checksum = sha256sum(&archive)?;
        debug!("{}: sha256 {}", archive.display(), checksum);
        Ok(checksum)
    }
}

/// Replace `path` with `content` through a sibling temporary file
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(existing) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), existing.permissions())?;
    }

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
