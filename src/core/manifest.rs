//! Site manifest loading and validation.
//!
//! Every buildable repository carries a `.gitstatic.yml` at its root naming
//! the site (`cname`) and the command that produces its static output
//! (`build_command`). The manifest is read once per pipeline run and never
//! written back.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Manifest file name, resolved against the checked-out repository root.
pub const MANIFEST_FILE: &str = ".gitstatic.yml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteManifest {
    /// Site identifier; becomes the deploy path segment under the web root.
    pub cname: String,
    /// Shell command line executed in the repository root to build the site.
    pub build_command: String,
}

impl SiteManifest {
    /// Load and validate the manifest from a checked-out repository root.
    ///
    /// A missing file is `Error::ManifestMissing` so callers can abort before
    /// any build or deploy action; a present but unusable file is
    /// `Error::Manifest`. Unknown keys are ignored.
    pub fn load(repo_root: &Path) -> Result<SiteManifest> {
        let path = repo_root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(Error::ManifestMissing);
        }

        let content = fs::read_to_string(&path)?;
        let manifest: SiteManifest =
            serde_yml::from_str(&content).map_err(|e| Error::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// The directory this site deploys into: `{web_root}/{cname}`.
    pub fn deploy_path(&self, web_root: &Path) -> PathBuf {
        web_root.join(&self.cname)
    }

    fn validate(&self) -> Result<()> {
        if self.cname.trim().is_empty() {
            return Err(Error::Manifest("cname must not be empty".to_string()));
        }

        // cname is a single path segment; anything else would resolve the
        // deploy path outside the web root.
        let cname_path = Path::new(&self.cname);
        let is_single_normal_segment = cname_path.components().count() == 1
            && matches!(cname_path.components().next(), Some(Component::Normal(_)));
        if !is_single_normal_segment {
            return Err(Error::Manifest(format!(
                "cname '{}' must be a plain directory name",
                self.cname
            )));
        }

        if self.build_command.trim().is_empty() {
            return Err(Error::Manifest(
                "build_command must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
