use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;

use commands::{build, serve};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "gitstatic")]
#[command(version = VERSION)]
#[command(about = "Build static sites from git repositories and mirror them into a web root")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone, build, and mirror one site into the web root
    Build(build::BuildArgs),
    /// Run the HTTP trigger service
    Serve(serve::ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => build::run(args).map(|_| ()),
        Commands::Serve(args) => serve::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", e.code(), e);
            ExitCode::FAILURE
        }
    }
}
