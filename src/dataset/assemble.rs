// src/dataset/assemble.rs
// =============================================================================
// Downloads the raw files a walk collected and glues them into two texts:
// all README files (the description) and all source files (the code).
// Each file's text is followed by a newline. A file whose bytes are not
// UTF-8 contributes a placeholder line instead of failing the repository.
// =============================================================================

use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::github::Hosts;

const UNREADABLE_DESCRIPTION: &str = "Unreadable description";
const UNREADABLE_SOURCE: &str = "Unreadable Source Code";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembled {
    pub source_code: String,
    pub description: String,
}

/// Fetches every raw href in `links`, in order.
pub async fn assemble(
    fetcher: &Fetcher,
    hosts: &Hosts,
    links: &[String],
) -> Result<Assembled, FetchError> {
    let mut assembled = Assembled::default();

    for href in links {
        let page = fetcher.get(&hosts.raw_url(href)).await?;

        let (blob, placeholder) = if is_readme_link(href) {
            (&mut assembled.description, UNREADABLE_DESCRIPTION)
        } else {
            (&mut assembled.source_code, UNREADABLE_SOURCE)
        };

        blob.push_str(page.text().unwrap_or(placeholder));
        blob.push('\n');
    }

    Ok(assembled)
}

fn is_readme_link(href: &str) -> bool {
    href.to_lowercase().ends_with("readme.md")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::recording_delay;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_readme_detection() {
        assert!(is_readme_link("/o/r/main/README.md"));
        assert!(is_readme_link("/o/r/main/docs/Readme.MD"));
        assert!(!is_readme_link("/o/r/main/readme.py"));
        assert!(!is_readme_link("/o/r/main/CONTRIBUTING.md"));
    }

    #[tokio::test]
    async fn test_assembles_two_blobs_in_order() {
        let server = MockServer::start().await;
        let bodies = [
            ("/o/r/main/README.md", "# Project"),
            ("/o/r/main/a.py", "import os"),
            ("/o/r/main/docs/readme.md", "More docs"),
            ("/o/r/main/b.py", "print(1)"),
        ];
        for (route, body) in bodies {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .mount(&server)
                .await;
        }

        let (delay, _) = recording_delay();
        let fetcher = Fetcher::builder().delay(delay).build().unwrap();
        let hosts = Hosts::new(&server.uri(), &server.uri());
        let links: Vec<String> = bodies.iter().map(|(route, _)| route.to_string()).collect();

        let assembled = assemble(&fetcher, &hosts, &links).await.unwrap();

        assert_eq!(assembled.source_code, "import os\nprint(1)\n");
        assert_eq!(assembled.description, "# Project\nMore docs\n");
    }

    #[tokio::test]
    async fn test_undecodable_file_becomes_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/o/r/main/blob.c"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xc3, 0x28, 0xff]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/o/r/main/README.md"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xfe, 0xfe]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/o/r/main/ok.c"))
            .respond_with(ResponseTemplate::new(200).set_body_string("int main;"))
            .mount(&server)
            .await;

        let (delay, _) = recording_delay();
        let fetcher = Fetcher::builder().delay(delay).build().unwrap();
        let hosts = Hosts::new(&server.uri(), &server.uri());
        let links = vec![
            "/o/r/main/blob.c".to_string(),
            "/o/r/main/README.md".to_string(),
            "/o/r/main/ok.c".to_string(),
        ];

        let assembled = assemble(&fetcher, &hosts, &links).await.unwrap();

        assert_eq!(assembled.source_code, "Unreadable Source Code\nint main;\n");
        assert_eq!(assembled.description, "Unreadable description\n");
    }
}
