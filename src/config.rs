// src/config.rs
// =============================================================================
// Run settings: built-in defaults, then an optional TOML file, then CLI flags.
//
// Example file:
//
//   request_language = "Python"
//   folders_limit = 10
//   source_code_files_limit = 50
//   page_limit = 5
//   to_csv = "dataset.csv"
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::fetch::Backoff;
use crate::github::Hosts;
use crate::walk::WalkLimits;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    pub request_language: Option<String>,
    pub folders_limit: usize,
    pub source_code_files_limit: usize,
    pub page_limit: usize,
    pub verbose: bool,
    pub to_csv: Option<PathBuf>,
    /// First wait after a 429, in seconds
    pub initial_wait_secs: f64,
    pub request_timeout_secs: u64,
    pub site_url: String,
    pub raw_url: String,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            request_language: None,
            folders_limit: 20,
            source_code_files_limit: 100,
            page_limit: 100,
            verbose: false,
            to_csv: None,
            initial_wait_secs: 120.0,
            request_timeout_secs: 30,
            site_url: "https://github.com".to_string(),
            raw_url: "https://raw.githubusercontent.com".to_string(),
        }
    }
}

impl HarvestConfig {
    /// Reads the TOML file at `path`, or returns the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: HarvestConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `--config` and lays the CLI flags on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Self::load(cli.config.as_deref())?;

        if let Some(language) = &cli.language {
            config.request_language = Some(language.clone());
        }
        if let Some(folders_limit) = cli.folders_limit {
            config.folders_limit = folders_limit;
        }
        if let Some(files_limit) = cli.files_limit {
            config.source_code_files_limit = files_limit;
        }
        if let Some(page_limit) = cli.page_limit {
            config.page_limit = page_limit;
        }
        if let Some(to_csv) = &cli.to_csv {
            config.to_csv = Some(to_csv.clone());
        }
        if cli.verbose {
            config.verbose = true;
        }

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.initial_wait_secs.is_finite() || self.initial_wait_secs < 0.0 {
            bail!(
                "initial_wait_secs must be a non-negative number, got {}",
                self.initial_wait_secs
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn limits(&self) -> WalkLimits {
        WalkLimits {
            folders: self.folders_limit,
            files: self.source_code_files_limit,
        }
    }

    pub fn hosts(&self) -> Hosts {
        Hosts::new(&self.site_url, &self.raw_url)
    }

    pub fn backoff(&self) -> Backoff {
        Backoff::starting_at(Duration::from_secs_f64(self.initial_wait_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
