// src/fetch/http.rs
// =============================================================================
// The HTTP fetcher every other component goes through.
//
// Behavior per status code:
// - 429 Too Many Requests: sleep, then retry with a longer wait (see backoff.rs).
//   Retries never stop on their own.
// - 404 Not Found: logged, returned as-is. Callers parse the body like any
//   other page, which for a folder listing means "no entries".
// - anything else: returned as-is on the first attempt.
//
// Transport failures (DNS, TLS, timeout) are NOT retried; they bubble up as
// FetchError and end the run.
//
// Rust concepts:
// - Builder pattern: Fetcher::builder() collects optional settings
// - Arc<dyn Fn>: the sleep function is shared, swappable behavior
// =============================================================================

use reqwest::{header::USER_AGENT, Client, StatusCode};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::agent;
use super::backoff::{tokio_delay, Backoff, Delay};
use crate::error::FetchError;

/// A fetched page: final status plus the raw body bytes.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Page {
    /// Body as UTF-8 text, or None if it is not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Body as text for HTML parsing; invalid bytes become U+FFFD.
    pub fn html(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

/// Sequential HTTP client with rate-limit backoff.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    backoff: Backoff,
    delay: Delay,
}

/// Optional settings for a Fetcher.
pub struct FetcherBuilder {
    timeout: Duration,
    backoff: Backoff,
    delay: Delay,
}

impl FetcherBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replaces the sleep function (tests pass a recording no-op).
    #[cfg(test)]
    pub fn delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    pub fn build(self) -> Result<Fetcher, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Fetcher {
            client,
            backoff: self.backoff,
            delay: self.delay,
        })
    }
}

impl Fetcher {
    pub fn builder() -> FetcherBuilder {
        FetcherBuilder {
            timeout: Duration::from_secs(30),
            backoff: Backoff::default(),
            delay: tokio_delay(),
        }
    }

    /// GETs `url`, waiting out any number of 429 responses.
    pub async fn get(&self, url: &str) -> Result<Page, FetchError> {
        let mut wait = self.backoff.initial;

        loop {
            let response = self
                .client
                .get(url)
                .header(USER_AGENT, agent::random_chrome())
                .send()
                .await
                .map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!(
                    "Status code {} for {}, waiting {:.1} seconds",
                    status.as_u16(),
                    url,
                    wait.as_secs_f64()
                );
                self.pause(wait).await;
                let unit: f64 = rand::thread_rng().gen();
                wait = self.backoff.next_wait(wait, unit);
                continue;
            }

            if status == StatusCode::NOT_FOUND {
                info!("Status code {}, url: {} not found", status.as_u16(), url);
            } else {
                debug!("GET {} -> {}", url, status.as_u16());
            }

            let body = response.bytes().await.map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;

            return Ok(Page {
                status,
                body: body.to_vec(),
            });
        }
    }

    /// Sleeps through the configured delay function.
    pub async fn pause(&self, duration: Duration) {
        (self.delay)(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::backoff::recording_delay;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(initial: Duration) -> (Fetcher, std::sync::Arc<std::sync::Mutex<Vec<Duration>>>) {
        let (delay, log) = recording_delay();
        let fetcher = Fetcher::builder()
            .backoff(Backoff::starting_at(initial))
            .delay(delay)
            .build()
            .unwrap();
        (fetcher, log)
    }

    #[tokio::test]
    async fn test_ok_on_first_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .expect(1)
            .mount(&server)
            .await;

        let (fetcher, log) = test_fetcher(Duration::from_secs(120));
        let page = fetcher.get(&format!("{}/ok", server.uri())).await.unwrap();

        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.text(), Some("hello"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retries_through_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(3)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/busy"))
            .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
            .mount(&server)
            .await;

        let (fetcher, log) = test_fetcher(Duration::from_secs(120));
        let page = fetcher.get(&format!("{}/busy", server.uri())).await.unwrap();

        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.text(), Some("finally"));

        let pauses = log.lock().unwrap().clone();
        assert_eq!(pauses.len(), 3);
        assert_eq!(pauses[0], Duration::from_secs(120));
        // Each wait = previous + 60s ± 7.5s
        for pair in pauses.windows(2) {
            let grown = pair[1].as_secs_f64() - pair[0].as_secs_f64();
            assert!((52.5..=67.5).contains(&grown), "grew by {}", grown);
        }
    }

    #[tokio::test]
    async fn test_not_found_is_returned_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&server)
            .await;

        let (fetcher, log) = test_fetcher(Duration::from_secs(120));
        let page = fetcher.get(&format!("{}/missing", server.uri())).await.unwrap();

        assert!(page.is_not_found());
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/boom"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (fetcher, _log) = test_fetcher(Duration::from_secs(120));
        let page = fetcher.get(&format!("{}/boom", server.uri())).await.unwrap();
        assert_eq!(page.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_page_text_rejects_invalid_utf8() {
        let page = Page {
            status: StatusCode::OK,
            body: vec![0xff, 0xfe, 0x00],
        };
        assert_eq!(page.text(), None);
        assert!(page.html().contains('\u{fffd}'));
    }
}
