// src/dataset/mod.rs
// =============================================================================
// The dataset table and its rows.
//
// One row per repository:
//   Link | SourceCode | Description | SourceCodeFilesNum | FoldersNum
//
// A row can only be made from a `Collected` repository, and a `Collected`
// only exists for walks that finished within budget and found at least one
// source file. Everything else is dropped before it reaches the table.
//
// Submodules:
// - assemble: downloads and concatenates the raw files of one repository
// - builder: runs the whole search -> walk -> assemble pipeline
// =============================================================================

mod assemble;
mod builder;

pub use builder::DatasetBuilder;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::walk::{Counters, Walk};
use assemble::Assembled;

/// CSV header, in column order.
pub const COLUMNS: [&str; 5] = [
    "Link",
    "SourceCode",
    "Description",
    "SourceCodeFilesNum",
    "FoldersNum",
];

/// A repository whose walk produced something worth downloading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub link: String,
    pub links: Vec<String>,
    pub counters: Counters,
}

impl Collected {
    /// Keeps the walk result only if it completed and found source files.
    pub fn from_walk(link: &str, walk: Walk, counters: Counters) -> Option<Self> {
        match walk {
            Walk::Complete(links) if counters.files > 0 => Some(Self {
                link: link.to_string(),
                links,
                counters,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetRow {
    pub link: String,
    pub source_code: String,
    pub description: String,
    pub source_code_files_num: usize,
    pub folders_num: usize,
}

impl DatasetRow {
    fn new(collected: Collected, assembled: Assembled) -> Self {
        Self {
            link: collected.link,
            source_code: assembled.source_code,
            description: assembled.description,
            source_code_files_num: collected.counters.files,
            folders_num: collected.counters.folders,
        }
    }
}

/// Rows accumulated across all queries of a run, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The Link column as a set.
    pub fn links(&self) -> HashSet<&str> {
        self.rows.iter().map(|row| row.link.as_str()).collect()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = DatasetRow>) {
        self.rows.extend(rows);
    }

    /// Writes the whole table to `path`, replacing any previous contents.
    ///
    /// The header row is always written, even for an empty table.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

        writer
            .write_record(COLUMNS)
            .with_context(|| format!("Failed to write CSV header: {}", path.display()))?;

        for row in &self.rows {
            writer
                .serialize(row)
                .with_context(|| format!("Failed to write row for {}", row.link))?;
        }

        writer
            .flush()
            .with_context(|| format!("Failed to flush CSV file: {}", path.display()))?;
        Ok(())
    }
}
