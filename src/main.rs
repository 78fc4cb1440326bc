mod activation;
mod cli;
mod config;
mod error;
mod openwhisk;

use anyhow::Result;
use clap::Parser;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr, activation logs own stdout
    let directive = if cli.verbose {
        "wsklogs=debug"
    } else {
        "wsklogs=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    cli::run(cli).await
}
