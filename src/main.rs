// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};
use url::Url;
use vitrine::browser::chromium::ChromiumSession;
use vitrine::config::{ScrapeConfig, SelectorOverride};
use vitrine::{export, pipeline};

#[derive(Parser)]
#[command(
    name = "vitrine",
    about = "Vitrine — scrape product records from a listing page",
    version
)]
struct Cli {
    /// Listing page URL to scrape
    url: String,

    /// Run the browser headless (no visible UI)
    #[arg(long)]
    headless: bool,

    /// Extra selector, 'css:' or 'xpath:' prefixed. Can be repeated.
    /// Reserved override hook; not consumed by extraction.
    #[arg(long = "selector")]
    selectors: Vec<String>,

    /// Output CSV path
    #[arg(long, default_value = "output/products.csv")]
    out: PathBuf,

    /// Also print the extracted records as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Overall wait for item containers, in milliseconds
    #[arg(long, default_value = "8000")]
    timeout: u64,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("vitrine={level}").parse()?),
        )
        .init();

    let url = Url::parse(&cli.url).with_context(|| format!("invalid URL: {}", cli.url))?;

    let config = ScrapeConfig {
        container_timeout_ms: cli.timeout,
        ..ScrapeConfig::default()
    };

    for raw in &cli.selectors {
        match SelectorOverride::parse(raw) {
            Some(sel) => debug!(%sel, "selector accepted but not wired into extraction"),
            None => warn!("ignoring selector without css:/xpath: prefix: {raw}"),
        }
    }

    let session = ChromiumSession::launch(cli.headless, config.navigation_timeout_ms)
        .await
        .context("failed to start browser session")?;

    let records = pipeline::run(Box::new(session), url.as_str(), &config).await?;

    export::write_csv(&records, &cli.out)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if !cli.quiet {
        if records.is_empty() {
            println!("No products matched on {url}");
        } else {
            println!("Saved {} records to {}", records.len(), cli.out.display());
        }
    }
    Ok(())
}
