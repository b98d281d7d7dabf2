// src/main.rs
// =============================================================================
// Entry point of the repo-harvester CLI.
//
// What happens here:
// 1. Parse command-line arguments and merge them with the config file
// 2. Set up logging (--verbose or RUST_LOG)
// 3. Run every query through the dataset builder
// 4. Print the rows (JSON) or a summary table
// 5. Exit with 0 = rows collected, 1 = empty dataset, 2 = error
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - defaults, TOML file, CLI overrides
mod dataset;   // src/dataset/ - rows, CSV output, the pipeline
mod error;     // src/error.rs - fetch/scrape error types
mod fetch;     // src/fetch/ - HTTP with rate-limit backoff
mod github;    // src/github/ - URLs and search pagination
mod walk;      // src/walk/ - repository tree walk

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::HarvestConfig;
use dataset::{Dataset, DatasetBuilder};
use fetch::Fetcher;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = HarvestConfig::from_cli(&cli)?;

    init_logging(config.verbose);

    let fetcher = Fetcher::builder()
        .timeout(config.request_timeout())
        .backoff(config.backoff())
        .build()
        .context("Failed to set up the HTTP client")?;

    let dataset = DatasetBuilder::new(&fetcher, &config)
        .create_dataset(&cli.queries)
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(dataset.rows())?);
    } else {
        print_table(&dataset);
    }

    if dataset.is_empty() {
        Ok(1)
    } else {
        Ok(0)
    }
}

// RUST_LOG wins when set; otherwise --verbose shows progress at info level.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_table(dataset: &Dataset) {
    println!("{:<60} {:>8} {:>8}", "LINK", "FILES", "FOLDERS");
    println!("{}", "=".repeat(78));

    for row in dataset.rows() {
        let link = if row.link.chars().count() > 57 {
            format!("{}...", row.link.chars().take(57).collect::<String>())
        } else {
            row.link.clone()
        };
        println!(
            "{:<60} {:>8} {:>8}",
            link, row.source_code_files_num, row.folders_num
        );
    }

    println!();
    let files: usize = dataset.rows().iter().map(|row| row.source_code_files_num).sum();
    println!("📊 Summary:");
    println!("   📦 Repositories: {}", dataset.len());
    println!("   📄 Source files: {}", files);
}
