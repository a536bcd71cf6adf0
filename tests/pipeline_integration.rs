//! End-to-end pipeline tests against throwaway git repositories.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use gitstatic::pipeline::{self, PipelineRequest};

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn rsync_available() -> bool {
    Command::new("rsync")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Create a committed site repository. `manifest` is the full manifest
/// content, or None for a repository without one.
fn init_site_repo(dir: &Path, manifest: Option<&str>) -> String {
    git(dir, &["init"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test User"]);

    fs::write(dir.join("index.html"), "<h1>example</h1>").expect("write index.html");
    if let Some(content) = manifest {
        fs::write(dir.join(".gitstatic.yml"), content).expect("write manifest");
    }

    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "Initial commit"]);

    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(dir)
        .output()
        .expect("rev-parse");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn request_for(repo: &Path, branch: &str, web_root: &Path) -> PipelineRequest {
    PipelineRequest {
        git_url: repo.to_string_lossy().to_string(),
        git_ref: branch.to_string(),
        web_root: web_root.to_path_buf(),
        keep_workdir: false,
    }
}

fn web_root_is_untouched(web_root: &Path) -> bool {
    fs::read_dir(web_root).expect("read web root").next().is_none()
}

#[test]
fn missing_manifest_aborts_before_build_and_deploy() {
    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    let branch = init_site_repo(upstream.path(), None);

    let err = pipeline::run(&request_for(upstream.path(), &branch, web_root.path()))
        .expect_err("pipeline should abort");

    assert_eq!(err.code(), "MANIFEST_MISSING");
    assert!(web_root_is_untouched(web_root.path()));
}

#[test]
fn failing_build_command_skips_the_mirror_step() {
    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    let branch = init_site_repo(
        upstream.path(),
        Some("cname: example\nbuild_command: exit 7\n"),
    );

    let err = pipeline::run(&request_for(upstream.path(), &branch, web_root.path()))
        .expect_err("pipeline should fail");

    assert!(err.to_string().starts_with("build command failed"));
    assert!(web_root_is_untouched(web_root.path()));
}

#[test]
fn build_that_produces_no_output_directory_fails_before_mirror() {
    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    let branch = init_site_repo(
        upstream.path(),
        Some("cname: example\nbuild_command: 'true'\n"),
    );

    let err = pipeline::run(&request_for(upstream.path(), &branch, web_root.path()))
        .expect_err("pipeline should fail");

    assert!(err.to_string().contains("gitstatic_build"));
    assert!(web_root_is_untouched(web_root.path()));
}

#[test]
fn unknown_ref_fails_in_the_checkout_phase() {
    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    init_site_repo(
        upstream.path(),
        Some("cname: example\nbuild_command: 'true'\n"),
    );

    let err = pipeline::run(&request_for(
        upstream.path(),
        "no-such-branch",
        web_root.path(),
    ))
    .expect_err("pipeline should fail");

    assert!(err.to_string().starts_with("git checkout failed"));
    assert!(web_root_is_untouched(web_root.path()));
}

#[test]
fn successful_run_mirrors_build_output_into_the_deploy_path() {
    if !rsync_available() {
        eprintln!("rsync not installed; skipping");
        return;
    }

    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    let branch = init_site_repo(
        upstream.path(),
        Some("cname: example\nbuild_command: mkdir -p gitstatic_build && cp index.html gitstatic_build/\n"),
    );

    let report = pipeline::run(&request_for(upstream.path(), &branch, web_root.path()))
        .expect("pipeline should succeed");

    assert_eq!(report.cname, "example");
    assert_eq!(report.deploy_path, web_root.path().join("example"));
    assert!(report.workdir.is_none());

    let deployed = web_root.path().join("example/index.html");
    assert_eq!(
        fs::read_to_string(&deployed).expect("deployed file"),
        "<h1>example</h1>"
    );

    // Re-running with an unchanged source is idempotent.
    let second = pipeline::run(&request_for(upstream.path(), &branch, web_root.path()))
        .expect("second run should succeed");
    assert_eq!(second.deploy_path, report.deploy_path);
    assert_eq!(
        fs::read_to_string(&deployed).expect("deployed file"),
        "<h1>example</h1>"
    );
}

#[test]
fn keep_workdir_retains_the_working_directory() {
    if !rsync_available() {
        eprintln!("rsync not installed; skipping");
        return;
    }

    let upstream = TempDir::new().expect("tempdir");
    let web_root = TempDir::new().expect("tempdir");
    let branch = init_site_repo(
        upstream.path(),
        Some("cname: example\nbuild_command: mkdir -p gitstatic_build && cp index.html gitstatic_build/\n"),
    );

    let mut request = request_for(upstream.path(), &branch, web_root.path());
    request.keep_workdir = true;

    let report = pipeline::run(&request).expect("pipeline should succeed");

    let workdir = report.workdir.expect("workdir should be retained");
    assert!(workdir.is_dir());
    assert!(workdir.join(".gitstatic.yml").is_file());

    fs::remove_dir_all(&workdir).expect("cleanup retained workdir");
}
