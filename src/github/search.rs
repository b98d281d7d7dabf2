// src/github/search.rs
// =============================================================================
// Walks the search result pages of one query and collects repository links.
//
// How it works:
// 1. Fetch page 1 of the results
// 2. Pull every repository link out of it (a.v-align-middle)
// 3. On page 1 only, read the pagination widget to learn the total page count
//    (no widget = a single page of results)
// 4. Keep going until the total or the caller's page limit is reached,
//    pausing a random 0-6 seconds between pages
//
// Links come back in page order and may contain duplicates; de-duplication
// is the dataset builder's job.
// =============================================================================

use rand::Rng;
use scraper::Html;
use std::time::Duration;
use tracing::info;

use super::Hosts;
use crate::error::{selector, ScrapeError};
use crate::fetch::Fetcher;

const REPOSITORY_LINK: &str = "a.v-align-middle";
const PAGINATION_CURRENT: &str = "em.current";
const REPOSITORY_COUNT: &str = r#"span.js-codesearch-count[data-search-type="Repositories"]"#;

/// Upper bound of the random pause between two result pages.
const MAX_POLITENESS_SECS: f64 = 6.0;

/// Collects repository hrefs for `query` from at most `page_limit` pages.
pub async fn collect_repositories(
    fetcher: &Fetcher,
    hosts: &Hosts,
    query: &str,
    language: Option<&str>,
    page_limit: usize,
) -> Result<Vec<String>, ScrapeError> {
    let mut page = 1;
    let mut total_pages = 1;
    let mut links = Vec::new();

    while page <= total_pages && page <= page_limit {
        let url = hosts.search_url(query, language, page)?;
        let html = fetcher.get(&url).await?.html();

        links.extend(parse_repository_links(&html)?);

        if page == 1 {
            if let Some(count) = parse_repository_count(&html)? {
                info!("Found {} repositories for the query: \"{}\"", count, query);
            }
            if let Some(total) = parse_total_pages(&html)? {
                total_pages = total;
            }
        }

        info!("{} page. {} links", page, links.len());
        page += 1;

        let pause = rand::thread_rng().gen_range(0.0..MAX_POLITENESS_SECS);
        fetcher.pause(Duration::from_secs_f64(pause)).await;
    }

    info!("Parsed {} pages", page - 1);
    Ok(links)
}

/// Repository hrefs listed on one result page, in page order.
pub fn parse_repository_links(html: &str) -> Result<Vec<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let links = selector(REPOSITORY_LINK)?;

    Ok(document
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Declared number of result pages, if the page has a pagination widget.
pub fn parse_total_pages(html: &str) -> Result<Option<usize>, ScrapeError> {
    let document = Html::parse_document(html);
    let current = selector(PAGINATION_CURRENT)?;

    Ok(document
        .select(&current)
        .next()
        .and_then(|em| em.value().attr("data-total-pages"))
        .and_then(|total| total.trim().parse().ok()))
}

/// The "N repositories" counter text, if present.
fn parse_repository_count(html: &str) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let counter = selector(REPOSITORY_COUNT)?;

    Ok(document
        .select(&counter)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string()))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why parse the page in separate functions?
//    - scraper::Html is not Send, so it must not live across an .await
//    - Parsing inside plain fns drops the document before the next request
//
// 2. What is filter_map?
//    - Runs a closure returning Option and keeps only the Some values
//    - Anchors without an href simply disappear from the result
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{recording_delay, Backoff};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn results_page(repos: &[&str], total_pages: Option<usize>) -> String {
        let mut html = String::from("<html><body><ul class=\"repo-list\">");
        for repo in repos {
            html.push_str(&format!(
                "<li><a class=\"v-align-middle\" href=\"{}\">{}</a></li>",
                repo, repo
            ));
        }
        html.push_str("</ul>");
        if let Some(total) = total_pages {
            html.push_str(&format!(
                "<div class=\"pagination\"><em class=\"current\" data-total-pages=\"{}\">1</em></div>",
                total
            ));
        }
        html.push_str("</body></html>");
        html
    }

    #[test]
    fn test_parse_repository_links() {
        let html = results_page(&["/a/one", "/b/two"], None);
        let links = parse_repository_links(&html).unwrap();
        assert_eq!(links, vec!["/a/one", "/b/two"]);
    }

    #[test]
    fn test_ignores_other_anchors() {
        let html = r#"<a href="/about">About</a><a class="v-align-middle" href="/x/y">x/y</a>"#;
        assert_eq!(parse_repository_links(html).unwrap(), vec!["/x/y"]);
    }

    #[test]
    fn test_total_pages_missing_widget() {
        let html = results_page(&["/a/one"], None);
        assert_eq!(parse_total_pages(&html).unwrap(), None);
    }

    #[test]
    fn test_total_pages_from_widget() {
        let html = results_page(&["/a/one"], Some(42));
        assert_eq!(parse_total_pages(&html).unwrap(), Some(42));
    }

    #[test]
    fn test_repository_count() {
        let html = r#"<span class="ml-1 mt-1 js-codesearch-count Counter Counter--gray" data-search-type="Repositories">1.2K</span>"#;
        assert_eq!(parse_repository_count(html).unwrap(), Some("1.2K".to_string()));
    }

    #[tokio::test]
    async fn test_stops_at_page_limit() {
        let server = MockServer::start().await;
        for page in 1..=3 {
            let repo = format!("/owner/repo{}", page);
            Mock::given(method("GET"))
                .and(path("/search"))
                .and(query_param("p", page.to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&[&repo], Some(5))))
                .mount(&server)
                .await;
        }

        let (delay, pauses) = recording_delay();
        let fetcher = Fetcher::builder()
            .backoff(Backoff::starting_at(Duration::from_millis(1)))
            .delay(delay)
            .build()
            .unwrap();
        let hosts = Hosts::new(&server.uri(), &server.uri());

        let links = collect_repositories(&fetcher, &hosts, "rust", Some("Rust"), 2)
            .await
            .unwrap();

        assert_eq!(links, vec!["/owner/repo1", "/owner/repo2"]);

        // One politeness pause per page, each under six seconds
        let pauses = pauses.lock().unwrap().clone();
        assert_eq!(pauses.len(), 2);
        assert!(pauses.iter().all(|p| *p < Duration::from_secs(6)));
    }

    #[tokio::test]
    async fn test_stops_at_declared_total_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["/o/r"], Some(2))))
            .expect(2)
            .mount(&server)
            .await;

        let (delay, pauses) = recording_delay();
        let fetcher = Fetcher::builder().delay(delay).build().unwrap();
        let hosts = Hosts::new(&server.uri(), &server.uri());

        let links = collect_repositories(&fetcher, &hosts, "rust", None, 100)
            .await
            .unwrap();

        // Page 2 repeats page 1's link; duplicates are kept here
        assert_eq!(links, vec!["/o/r", "/o/r"]);
        assert_eq!(pauses.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_single_page_without_widget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "tiny query"))
            .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["/only/one"], None)))
            .expect(1)
            .mount(&server)
            .await;

        let (delay, _) = recording_delay();
        let fetcher = Fetcher::builder().delay(delay).build().unwrap();
        let hosts = Hosts::new(&server.uri(), &server.uri());

        let links = collect_repositories(&fetcher, &hosts, "tiny query", None, 100)
            .await
            .unwrap();

        assert_eq!(links, vec!["/only/one"]);
    }
}
