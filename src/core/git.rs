//! Git operations for the build pipeline.
//!
//! Thin wrappers over the git CLI. Every call checks the exit status and
//! fails with an error naming the phase, so a pipeline failure always reads
//! as "git clone failed: ..." rather than a bare exit code.

use std::path::Path;

use crate::error::Result;
use crate::utils::command;

/// Clone `url` into `dest` with full history.
pub fn clone(url: &str, dest: &Path) -> Result<()> {
    command::run("git", &["clone", url, &dest.to_string_lossy()], "git clone")
}

/// Update remote-tracking refs from origin.
pub fn fetch_origin(repo: &Path) -> Result<()> {
    command::run_in(repo, "git", &["fetch", "origin"], "git fetch")
}

/// Check out the remote-tracking state of `git_ref` (detached).
///
/// The target is always `origin/{git_ref}`: the pipeline builds what the
/// remote has, not whatever local branch the clone happened to create.
pub fn checkout_remote(repo: &Path, git_ref: &str) -> Result<()> {
    let target = format!("origin/{}", git_ref);
    command::run_in(repo, "git", &["checkout", &target], "git checkout")
}

/// Initialize and fetch any submodules referenced by the checked-out tree.
pub fn update_submodules(repo: &Path) -> Result<()> {
    command::run_in(
        repo,
        "git",
        &["submodule", "update", "--init"],
        "git submodule update",
    )
}
