mod config;
mod shell;
#[cfg(test)]
mod testing;
mod views;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use melodex::{Melodex, Session, session::FileStorage};

use crate::shell::router::Route;

/// Terminal front end for a melodex music library.
#[derive(Parser, Debug)]
#[command(name = "mdx", version)]
struct Args {
    /// Extra config file merged over the default locations
    #[arg(short, long, env = "MDX_CONFIG")]
    config: Option<PathBuf>,

    /// Page to open first, e.g. /library
    #[arg(short, long)]
    route: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        // stdout belongs to the shell
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or("melodex=warn,mdx=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    let storage = config
        .session
        .storage
        .clone()
        .unwrap_or_else(FileStorage::default_path);
    tracing::debug!(path = %storage.display(), "session storage");
    let session = Session::new(FileStorage::new(storage));

    let client = Melodex::new(&config.api.base_url, session)
        .with_context(|| format!("invalid api base url {}", config.api.base_url))?;

    let start = args.route.as_deref().unwrap_or(&config.ui.start);
    let start = Route::parse(start).with_context(|| format!("no page at {start}"))?;

    shell::start(client, config, start).await
}
