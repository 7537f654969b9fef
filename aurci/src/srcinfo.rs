//! `.SRCINFO` generation

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::{Error, Result};

pub const SRCINFO_FILE: &str = ".SRCINFO";

/// Produces the `.SRCINFO` content for the recipe in a package directory
pub trait SrcinfoGenerator {
    fn generate(&self, recipe_dir: &Path) -> Result<String>;
}

/// Runs `makepkg --printsrcinfo` and captures its output
///
/// makepkg is looked up on PATH at generation time, so packages that never
/// reach the sidecar step do not need it installed.
#[derive(Default)]
pub struct MakepkgSrcinfo {
    makepkg: Option<PathBuf>,
}

impl MakepkgSrcinfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program<P: Into<PathBuf>>(makepkg: P) -> Self {
        Self {
            makepkg: Some(makepkg.into()),
        }
    }

    fn program(&self) -> Result<PathBuf> {
        match &self.makepkg {
            Some(path) => Ok(path.clone()),
            None => which::which("makepkg")
                .map_err(|_| Error::Srcinfo("makepkg not found".to_string())),
        }
    }
}

impl SrcinfoGenerator for MakepkgSrcinfo {
    fn generate(&self, recipe_dir: &Path) -> Result<String> {
        let makepkg = self.program()?;
        let output = Command::new(&makepkg)
            .arg("--printsrcinfo")
            .current_dir(recipe_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Srcinfo(format!("{}: {}", makepkg.display(), e)))?;

        if !output.status.success() {
            return Err(Error::Srcinfo(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        String::from_utf8(output.stdout).map_err(|e| Error::Srcinfo(e.to_string()))
    }
}
