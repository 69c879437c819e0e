// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and set up logging
// 2. Resolve the settings (sitemap URL, variants, delay...)
// 3. Pre-check and download the sitemap
// 4. Run the warmer and print the summary
// 5. Exit with proper code (0 = warmed, 2 = couldn't start)
//
// A run that started always exits 0, even when some requests failed:
// those failures are in the log and in the summary.
// =============================================================================

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};

use sitemap_warmer::cli::Cli;
use sitemap_warmer::sitemap::{self, SitemapIndex};
use sitemap_warmer::warmer::{HttpTransport, Warmer};
use sitemap_warmer::{logging, Settings};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Unexpected error (logging setup, JSON output...)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = run completed
//   Ok(2) = fatal pre-run error (already logged)
//   Err   = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.quiet)?;

    let settings = match Settings::from_cli(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            // Bad sitemap URL, --origin or --header; the error names which one
            error!("Invalid settings: {}", e);
            return Ok(2);
        }
    };

    let transport = HttpTransport::new(settings.timeout)?;
    let client = transport.client().clone();

    if let Err(e) = sitemap::precheck(&client, &settings.sitemap_url, &settings.custom_headers).await
    {
        error!("Sitemap is not reachable: {}", e);
        return Ok(2);
    }

    info!("📬 Getting sitemap from {}", settings.sitemap_url);
    let entries =
        match sitemap::fetch_sitemap(&client, &settings.sitemap_url, &settings.custom_headers).await
        {
            Ok(entries) => entries,
            Err(e) => {
                error!("Could not read sitemap: {}", e);
                return Ok(2);
            }
        };

    let index = SitemapIndex::from_entries(entries);
    info!("📄 Found {} URL(s) in sitemap", index.len());

    let json = cli.json;
    let mut warmer = Warmer::new(settings, Arc::new(transport));
    let summary = warmer.run(&index, Utc::now()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(0)
}
