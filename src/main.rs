//! Sumi-Fetch main entry point
//!
//! This is the command-line interface for the Sumi-Fetch client.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_fetch::config::{load_options, validate, Options};
use sumi_fetch::FetchClient;
use tracing_subscriber::EnvFilter;

/// Sumi-Fetch: GET pages through rotating proxies with persisted cookies
///
/// Each URL is fetched in order; the status code and final URL are printed
/// for every response.
#[derive(Parser, Debug)]
#[command(name = "sumi-fetch")]
#[command(version = "1.0.0")]
#[command(about = "Fetch URLs through rotating proxies with per-domain cookies", long_about = None)]
struct Cli {
    /// URLs to fetch
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// User-Agent header (overrides the config file)
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Proxy list, one URL per line (overrides the config file)
    #[arg(long, value_name = "FILE")]
    proxy_file: Option<PathBuf>,

    /// Cookie directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    cookie_dir: Option<PathBuf>,

    /// Referer header sent with every request
    #[arg(long, value_name = "URL")]
    referer: Option<String>,

    /// Print response bodies after the status line
    #[arg(long)]
    body: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut options = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_options(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?
        }
        None => Options::default(),
    };

    if cli.user_agent.is_some() {
        options.user_agent = cli.user_agent.clone();
    }
    if cli.proxy_file.is_some() {
        options.proxy_file = cli.proxy_file.clone();
    }
    if cli.cookie_dir.is_some() {
        options.cookie_dir = cli.cookie_dir.clone();
    }
    validate(&options).context("invalid options")?;

    let client = FetchClient::standalone(options).context("failed to build client")?;
    tracing::info!(
        "Client ready (user agent: {}, proxies: {}, cookie domains: {})",
        client.user_agent(),
        client.proxies().len(),
        client.cookies().len()
    );

    for url in &cli.urls {
        let response = client
            .get(url, cli.referer.as_deref())
            .await
            .with_context(|| format!("failed to fetch {}", url))?;

        println!("{} {}", response.status().as_u16(), response.url());
        if cli.body {
            let text = response
                .text()
                .await
                .with_context(|| format!("failed to read body of {}", url))?;
            println!("{}", text);
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_fetch=info,warn"),
            1 => EnvFilter::new("sumi_fetch=debug,info"),
            2 => EnvFilter::new("sumi_fetch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
