use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitstatic::pipeline::DEFAULT_WEB_ROOT;
use gitstatic::service;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8888")]
    pub bind: String,

    /// Base deploy directory for triggered builds
    #[arg(long, default_value = DEFAULT_WEB_ROOT)]
    pub web_root: PathBuf,
}

pub fn run(args: ServeArgs) -> gitstatic::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gitstatic=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(service::serve(&args.bind, args.web_root))?;
    Ok(())
}
