use clap::Parser;
use tracing_subscriber::EnvFilter;

use reposize::cli;
use reposize::cli::Args;
use reposize::config::load_config;
use reposize::error::Result;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_config()?;
    cli::run(args, config).await?;
    Ok(())
}
