// src/dataset/builder.rs
// =============================================================================
// Runs the whole pipeline, one query at a time:
//
// 1. Collect repository links from up to `page_limit` search pages
// 2. Drop duplicates and anything already in the table's Link column
// 3. For each remaining repository (in sorted order):
//    - fetch its front page; no .md link on it -> dispose
//    - walk its tree; budget exceeded or zero source files -> dispose
// 4. Download and concatenate the files of the survivors into rows
// 5. Append the rows; if a CSV path is configured, rewrite the file
//
// Everything is sequential: one request in flight at any time.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::assemble::assemble;
use super::{Collected, Dataset, DatasetRow};
use crate::config::HarvestConfig;
use crate::fetch::Fetcher;
use crate::github::{collect_repositories, Hosts};
use crate::walk::{has_markdown_link, SiteTree, Walker};

pub struct DatasetBuilder<'a> {
    fetcher: &'a Fetcher,
    config: &'a HarvestConfig,
    hosts: Hosts,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(fetcher: &'a Fetcher, config: &'a HarvestConfig) -> Self {
        Self {
            fetcher,
            config,
            hosts: config.hosts(),
        }
    }

    /// Builds the dataset for all `queries`, checkpointing after each one.
    pub async fn create_dataset<I, Q>(&self, queries: I) -> Result<Dataset>
    where
        I: IntoIterator<Item = Q>,
        Q: AsRef<str>,
    {
        let mut dataset = Dataset::new();
        for query in queries {
            self.run_query(query.as_ref(), &mut dataset).await?;
        }
        Ok(dataset)
    }

    /// Adds the rows for one query to `dataset`. Returns how many were added.
    pub async fn run_query(&self, query: &str, dataset: &mut Dataset) -> Result<usize> {
        let found = collect_repositories(
            self.fetcher,
            &self.hosts,
            query,
            self.config.request_language.as_deref(),
            self.config.page_limit,
        )
        .await
        .with_context(|| format!("Failed to collect search results for \"{}\"", query))?;

        let fresh = fresh_links(found, dataset);
        let collected = self.collect_contents(&fresh).await?;
        let rows = self.parse_folders(collected).await?;
        let added = rows.len();

        dataset.extend(rows);

        if let Some(path) = &self.config.to_csv {
            dataset.write_csv(path)?;
            info!("Saved {} rows to {}", dataset.len(), path.display());
        }

        Ok(added)
    }

    /// Walks every repository and keeps the ones that produce a row.
    async fn collect_contents(&self, links: &[String]) -> Result<Vec<Collected>> {
        info!("Collecting...");

        let source = SiteTree::new(self.fetcher, &self.hosts);
        let walker = Walker::new(&source, self.config.limits());
        let mut collected = Vec::new();

        for (index, href) in links.iter().enumerate() {
            debug!("[{}/{}] {}", index + 1, links.len(), href);

            let front = self.fetcher.get(&self.hosts.page_url(href)).await?;
            if !has_markdown_link(&front.html())? {
                debug!("{}: no markdown files, skipped", href);
                continue;
            }

            let (walk, counters) = walker
                .walk(href)
                .await
                .with_context(|| format!("Failed to walk repository {}", href))?;

            match Collected::from_walk(href, walk, counters) {
                Some(repository) => collected.push(repository),
                None => debug!(
                    "{}: disposed ({} folders, {} files)",
                    href, counters.folders, counters.files
                ),
            }
        }

        let disposed = links.len() - collected.len();
        if disposed > 0 {
            info!("Disposed of {} repositories due to the limitations", disposed);
        }

        Ok(collected)
    }

    /// Downloads the collected files of each repository into a row.
    async fn parse_folders(&self, collected: Vec<Collected>) -> Result<Vec<DatasetRow>> {
        info!("Parsing...");

        let mut rows = Vec::with_capacity(collected.len());
        for repository in collected {
            let assembled = assemble(self.fetcher, &self.hosts, &repository.links)
                .await
                .with_context(|| format!("Failed to download files of {}", repository.link))?;
            rows.push(DatasetRow::new(repository, assembled));
        }

        Ok(rows)
    }
}

/// Sorted, de-duplicated `found` links that are not in the table yet.
fn fresh_links(found: Vec<String>, dataset: &Dataset) -> Vec<String> {
    let seen = dataset.links();
    found
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|link| !seen.contains(link.as_str()))
        .collect()
}
