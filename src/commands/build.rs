use clap::Args;
use std::path::PathBuf;

use gitstatic::pipeline::{self, PipelineReport, PipelineRequest, DEFAULT_GIT_REF, DEFAULT_WEB_ROOT};

#[derive(Args)]
pub struct BuildArgs {
    /// Which git url should we build?
    #[arg(long)]
    pub git_url: String,

    /// Which branch or commit should we build?
    #[arg(long, default_value = DEFAULT_GIT_REF)]
    pub git_ref: String,

    /// Where would you like the built assets to live?
    #[arg(long, default_value = DEFAULT_WEB_ROOT)]
    pub web_root: PathBuf,

    /// Retain the temporary working directory for debugging
    #[arg(long)]
    pub keep_workdir: bool,
}

pub fn run(args: BuildArgs) -> gitstatic::Result<PipelineReport> {
    let request = PipelineRequest {
        git_url: args.git_url,
        git_ref: args.git_ref,
        web_root: args.web_root,
        keep_workdir: args.keep_workdir,
    };

    let report = pipeline::run(&request)?;

    println!(
        "Success! {} has been built and is now hosted at {} from {}",
        report.git_url,
        report.cname,
        report.deploy_path.display()
    );
    if let Some(workdir) = &report.workdir {
        println!("Working directory retained at {}", workdir.display());
    }

    Ok(report)
}
