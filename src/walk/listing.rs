// src/walk/listing.rs
// =============================================================================
// Reading one folder of a repository.
//
// A folder page on the site is a table; every row has a `td.content` cell
// holding a single anchor. The anchor's href tells us what the row is:
//   /owner/repo/blob/<branch>/path  -> a file   (Blob)
//   /owner/repo/tree/<branch>/path  -> a folder (Tree)
// and its title attribute is the display name.
//
// The walker does not care where listings come from, only that it can ask
// for one by path. That is the TreeSource trait; the real implementation
// fetches the folder page over HTTP, tests use an in-memory map.
// =============================================================================

use async_trait::async_trait;
use scraper::Html;
use tracing::debug;

use crate::error::{selector, ScrapeError};
use crate::fetch::Fetcher;
use crate::github::Hosts;

const ENTRY_CELL: &str = "td.content";
const ENTRY_LINK: &str = "a";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A file
    Blob,
    /// A folder
    Tree,
}

/// One row of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub kind: NodeKind,
    /// Host-relative href, e.g. "/owner/repo/blob/main/a.py"
    pub path: String,
    /// Display name, e.g. "a.py"
    pub title: String,
}

impl TreeNode {
    pub fn blob(path: &str, title: &str) -> Self {
        Self {
            kind: NodeKind::Blob,
            path: path.to_string(),
            title: title.to_string(),
        }
    }

    pub fn tree(path: &str, title: &str) -> Self {
        Self {
            kind: NodeKind::Tree,
            path: path.to_string(),
            title: title.to_string(),
        }
    }
}

/// Anything that can list the entries of a folder by its href.
#[async_trait]
pub trait TreeSource {
    async fn list(&self, path: &str) -> Result<Vec<TreeNode>, ScrapeError>;
}

/// Folder listings fetched from the live site.
pub struct SiteTree<'a> {
    fetcher: &'a Fetcher,
    hosts: &'a Hosts,
}

impl<'a> SiteTree<'a> {
    pub fn new(fetcher: &'a Fetcher, hosts: &'a Hosts) -> Self {
        Self { fetcher, hosts }
    }
}

#[async_trait]
impl<'a> TreeSource for SiteTree<'a> {
    async fn list(&self, path: &str) -> Result<Vec<TreeNode>, ScrapeError> {
        let page = self.fetcher.get(&self.hosts.page_url(path)).await?;
        if page.is_not_found() {
            // No listing table in a 404 body: the folder reads as empty
            debug!("{}: listing not found", path);
        }
        parse_listing(&page.html())
    }
}

/// Extracts the file/folder rows of a folder page, in page order.
///
/// Rows whose anchor has no href, or whose href is neither a blob nor a
/// tree (submodule links, commit links), are skipped.
pub fn parse_listing(html: &str) -> Result<Vec<TreeNode>, ScrapeError> {
    let document = Html::parse_document(html);
    let cells = selector(ENTRY_CELL)?;
    let anchors = selector(ENTRY_LINK)?;

    let mut nodes = Vec::new();
    for cell in document.select(&cells) {
        let Some(link) = cell.select(&anchors).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let title = link.value().attr("title").unwrap_or_default();

        if href.contains("/blob/") {
            nodes.push(TreeNode::blob(href, title));
        } else if href.contains("/tree/") {
            nodes.push(TreeNode::tree(href, title));
        }
    }

    Ok(nodes)
}

/// Does the page link to at least one markdown file?
///
/// Repositories whose front page has no `.md` anchor are not walked at all.
pub fn has_markdown_link(html: &str) -> Result<bool, ScrapeError> {
    let document = Html::parse_document(html);
    let titled = selector("a[title]")?;

    Ok(document
        .select(&titled)
        .filter_map(|a| a.value().attr("title"))
        .any(|title| title.ends_with(".md")))
}
