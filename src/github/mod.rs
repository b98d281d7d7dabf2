// src/github/mod.rs
// =============================================================================
// URLs on the code-hosting site.
//
// Three kinds of address are needed:
// - search pages:  {site}/search?l=<lang>&p=<page>&q=<query>&type=Repositories
// - viewer pages:  {site}{href}             (repository root, folder listings)
// - raw content:   {raw}{href without /blob/}
//
// Hrefs scraped from the site are host-relative ("/owner/repo/blob/main/a.py"),
// so joining is plain concatenation onto the configured host.
//
// Submodules:
// - search: walks search result pages and collects repository links
// =============================================================================

mod search;

pub use search::collect_repositories;

use url::Url;

use crate::error::ScrapeError;

/// Base addresses of the site and its raw-content mirror.
#[derive(Debug, Clone)]
pub struct Hosts {
    pub site: String,
    pub raw: String,
}

impl Hosts {
    pub fn new(site: &str, raw: &str) -> Self {
        Self {
            site: site.trim_end_matches('/').to_string(),
            raw: raw.trim_end_matches('/').to_string(),
        }
    }

    /// Viewer URL for a host-relative href.
    pub fn page_url(&self, href: &str) -> String {
        format!("{}{}", self.site, href)
    }

    /// Raw-content URL for an already rewritten href.
    pub fn raw_url(&self, href: &str) -> String {
        format!("{}{}", self.raw, href)
    }

    /// Search URL for one page of repository results.
    ///
    /// The query is form-encoded (spaces become '+'). The language filter
    /// is left out entirely when none is configured.
    pub fn search_url(
        &self,
        query: &str,
        language: Option<&str>,
        page: usize,
    ) -> Result<String, ScrapeError> {
        let base = format!("{}/search", self.site);
        let mut url = Url::parse(&base).map_err(|source| ScrapeError::Url {
            url: base.clone(),
            source,
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(language) = language {
                pairs.append_pair("l", language);
            }
            pairs
                .append_pair("p", &page.to_string())
                .append_pair("q", query)
                .append_pair("type", "Repositories");
        }

        Ok(url.to_string())
    }
}

impl Default for Hosts {
    fn default() -> Self {
        Self::new("https://github.com", "https://raw.githubusercontent.com")
    }
}

/// Turns a viewer href into the href of the raw file.
///
/// "/owner/repo/blob/main/src/a.py" -> "/owner/repo/main/src/a.py"
///
/// Every "/blob/" segment is dropped, including a folder literally named
/// `blob`; the raw host is addressed the same way.
pub fn raw_href(href: &str) -> String {
    href.replace("/blob/", "/")
}
