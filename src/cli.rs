// src/cli.rs
// =============================================================================
// Command-line interface, defined with clap's derive API.
//
// Every option is optional: anything left out falls back to the config file
// (--config) and then to the built-in defaults. See config.rs for the merge.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "repo-harvester",
    version = "0.1.0",
    about = "Builds a source-code/README dataset from GitHub search results",
    long_about = "repo-harvester runs one or more repository searches on GitHub, walks every \
                  result's file tree under folder/file budgets, downloads the matching source \
                  files and READMEs, and emits one row per repository: \
                  Link, SourceCode, Description, SourceCodeFilesNum, FoldersNum."
)]
pub struct Cli {
    /// Search queries, one dataset pass each
    ///
    /// Example: repo-harvester "neural network" "web scraper" --language Python
    #[arg(required = true)]
    pub queries: Vec<String>,

    /// Only return repositories in this language
    #[arg(long, short = 'l')]
    pub language: Option<String>,

    /// Max folders counted per repository (folders without source files are not counted)
    #[arg(long)]
    pub folders_limit: Option<usize>,

    /// Max source files (.py .java .c .cpp .h) per repository
    #[arg(long)]
    pub files_limit: Option<usize>,

    /// Max search result pages per query
    #[arg(long)]
    pub page_limit: Option<usize>,

    /// Write the dataset to this CSV file, rewritten after every query
    #[arg(long, value_name = "PATH")]
    pub to_csv: Option<PathBuf>,

    /// Log progress (pages, waits, disposed repositories)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print the dataset rows as JSON instead of a summary table
    #[arg(long)]
    pub json: bool,

    /// TOML file with default settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
