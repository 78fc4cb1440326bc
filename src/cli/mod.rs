use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use crate::activation::{activation_name, ActivationPresenter, PollLoop, PollOptions};
use crate::config::{self, ServiceDescriptor, Settings, WskProps};
use crate::openwhisk::OpenWhiskClient;

#[derive(Parser, Debug)]
#[command(
    name = "wsklogs",
    version,
    about = "Tail activation logs of a deployed OpenWhisk function"
)]
pub struct Cli {
    /// Function name as declared in the service descriptor
    pub function: String,

    /// Stage of the service (default: from serverless.yml, else "dev")
    #[arg(short, long)]
    pub stage: Option<String>,

    /// Region of the service (default: from serverless.yml, else "us-east-1")
    #[arg(short, long)]
    pub region: Option<String>,

    /// Poll interval in milliseconds when tailing
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Keep polling for new activations until interrupted
    #[arg(short, long, visible_alias = "follow")]
    pub tail: bool,

    /// Activations fetched per poll (1-200)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Namespace to list activations from (default: the credentials' own)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Service descriptor path (default: ./serverless.yml)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Tool settings path
    #[arg(long)]
    pub settings: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Poll options for `deployed_action`: CLI flags over settings.
    pub fn poll_options(&self, deployed_action: &str, settings: &Settings) -> PollOptions {
        let mut options = PollOptions::new(activation_name(deployed_action));
        options.interval = Duration::from_millis(self.interval.unwrap_or(settings.interval_ms));
        options.follow = self.tail;
        options.limit = self.limit.unwrap_or(settings.limit);
        if let Some(namespace) = self.namespace.clone().or_else(|| settings.namespace.clone()) {
            options.namespace = namespace;
        }
        options
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings_path = match &cli.settings {
        Some(path) => config::expand_path(path),
        None => config::settings_path()?,
    };
    let settings = Settings::load_or_default(&settings_path)?;

    if cli.no_color || !settings.color {
        colored::control::set_override(false);
    }

    let descriptor = match &cli.config {
        Some(path) => ServiceDescriptor::load(&config::expand_path(path))?,
        None => {
            let cwd = std::env::current_dir().context("Could not determine working directory")?;
            ServiceDescriptor::discover(&cwd)?
        }
    };
    let action = descriptor.resolve_function(&cli.function)?;
    tracing::debug!(
        function = %cli.function,
        action = %action,
        stage = %descriptor.stage(cli.stage.as_deref()),
        region = %descriptor.region(cli.region.as_deref()),
        "Resolved function"
    );

    let mut props = WskProps::resolve()?;
    if cli.insecure {
        props.ignore_certs = true;
    }
    let client_config =
        props.client_config(Duration::from_secs(settings.request_timeout_secs))?;
    let client = OpenWhiskClient::new(&client_config);

    let options = cli.poll_options(&action, &settings);
    let presenter = ActivationPresenter::new(std::io::stdout(), cli.function.clone());
    let cancel = CancellationToken::new();
    let mut poll = PollLoop::new(client, presenter, options).with_cancellation(cancel.clone());

    // First Ctrl+C stops after the current cycle, a second one exits at once
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::debug!("Interrupt received, stopping after current cycle");
        cancel.cancel();
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let summary = poll.run().await?;
    tracing::debug!(
        cycles = summary.cycles,
        rendered = summary.rendered,
        "Finished"
    );
    Ok(())
}
