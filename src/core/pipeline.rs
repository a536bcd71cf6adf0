//! The build-and-deploy pipeline.
//!
//! A single run is a strictly sequential sequence of external-process
//! invocations: clone, fetch, checkout, submodule init, manifest validation,
//! build, mirror. There is no retry and no partial-failure recovery; the
//! first error terminates the run, named after the phase that failed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::git;
use crate::log_status;
use crate::manifest::SiteManifest;
use crate::mirror;
use crate::utils::command;
use crate::workdir::Workdir;

/// Build output convention: the manifest's build command must leave the
/// finished site under this directory at the repository root.
pub const BUILD_DIR: &str = "gitstatic_build";

pub const DEFAULT_GIT_REF: &str = "master";
pub const DEFAULT_WEB_ROOT: &str = "/var/www";

/// One repository/ref/destination triple to build and deploy.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub git_url: String,
    pub git_ref: String,
    pub web_root: PathBuf,
    /// Retain the temporary working directory for debugging.
    pub keep_workdir: bool,
}

impl PipelineRequest {
    pub fn new(git_url: impl Into<String>) -> Self {
        Self {
            git_url: git_url.into(),
            git_ref: DEFAULT_GIT_REF.to_string(),
            web_root: PathBuf::from(DEFAULT_WEB_ROOT),
            keep_workdir: false,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub git_url: String,
    pub cname: String,
    pub deploy_path: PathBuf,
    /// Set when the working directory was retained via `keep_workdir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<PathBuf>,
}

/// Run one build-and-deploy cycle.
pub fn run(request: &PipelineRequest) -> Result<PipelineReport> {
    let workdir = Workdir::create()?;
    let repo = workdir.path().to_path_buf();

    log_status!("clone", "Cloning {} into {}", request.git_url, repo.display());
    git::clone(&request.git_url, &repo)?;

    log_status!("checkout", "Checking out origin/{}", request.git_ref);
    git::fetch_origin(&repo)?;
    git::checkout_remote(&repo, &request.git_ref)?;
    git::update_submodules(&repo)?;

    let manifest = SiteManifest::load(&repo)?;
    let deploy_path = manifest.deploy_path(&request.web_root);

    log_status!("build", "Running build command: {}", manifest.build_command);
    command::run_shell_in(&repo, &manifest.build_command, "build command")?;

    let build_output = repo.join(BUILD_DIR);
    if !build_output.is_dir() {
        return Err(Error::Other(format!(
            "build command succeeded but produced no {} directory in the repository root",
            BUILD_DIR
        )));
    }

    log_status!(
        "mirror",
        "Mirroring {} into {}",
        build_output.display(),
        deploy_path.display()
    );
    mirror::mirror(&build_output, &deploy_path)?;

    let kept = request.keep_workdir.then(|| workdir.keep());

    Ok(PipelineReport {
        git_url: request.git_url.clone(),
        cname: manifest.cname,
        deploy_path,
        workdir: kept,
    })
}
