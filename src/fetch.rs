//! Pulling annotation pages from the remote API.
//!
//! The API is paginated and authenticated with the browser session's cookies.
//! Pages are kept as raw JSON so that a dump written from them holds every
//! field the server sent, not just the ones this crate reads.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use serde_json::Value;

use crate::error::{Error, Result};

/// Default listing endpoint for all of a user's annotations.
pub const DEFAULT_ENDPOINT: &str = "https://learning.oreilly.com/api/v1/annotations/all/";

/// Where and how to fetch pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub endpoint: String,
    pub page_size: u32,
    /// Pause between consecutive page requests.
    pub delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: 100,
            delay: Duration::from_secs(1),
        }
    }
}

impl FetchConfig {
    /// URL of the first page.
    pub fn first_page_url(&self) -> String {
        format!("{}?page_size={}", self.endpoint, self.page_size)
    }
}

/// Parse a `name=value; name=value` cookie string.
pub fn parse_cookies(content: &str) -> Result<Vec<(String, String)>> {
    content
        .trim()
        .split("; ")
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| Error::InvalidCookies(entry.to_string()))
        })
        .collect()
}

/// Load cookies from `source`, which is either a path to a file holding the
/// cookie string or the cookie string itself.
pub fn load_cookies(source: &str) -> Result<Vec<(String, String)>> {
    let path = Path::new(source);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "reading cookies from file");
        parse_cookies(&fs::read_to_string(path)?)
    } else {
        parse_cookies(source)
    }
}

/// Render cookies back into a `Cookie` header value.
pub fn cookie_header(cookies: &[(String, String)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Blocking client walking the paginated listing.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    cookie: String,
}

impl Fetcher {
    pub fn new(config: FetchConfig, cookies: &[(String, String)]) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            config,
            cookie: cookie_header(cookies),
        })
    }

    /// Fetch every page, following `next` links until there are none.
    pub fn fetch_all(&self) -> Result<Vec<Value>> {
        let mut pages = Vec::new();
        let mut url = self.config.first_page_url();

        loop {
            tracing::info!(%url, "fetching annotations page");
            let page: Value = self
                .client
                .get(&url)
                .header(COOKIE, &self.cookie)
                .send()?
                .error_for_status()?
                .json()?;

            let next = next_page(&page);
            pages.push(page);

            match next {
                Some(next) => {
                    url = next;
                    thread::sleep(self.config.delay);
                }
                None => break,
            }
        }

        tracing::info!(pages = pages.len(), "fetched all annotation pages");
        Ok(pages)
    }
}

fn next_page(page: &Value) -> Option<String> {
    page.get("next")
        .and_then(Value::as_str)
        .filter(|next| !next.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("sessionid=abc; csrftoken=x=y\n").unwrap();
        assert_eq!(
            cookies,
            vec![
                ("sessionid".to_string(), "abc".to_string()),
                ("csrftoken".to_string(), "x=y".to_string()),
            ]
        );
        assert_eq!(cookie_header(&cookies), "sessionid=abc; csrftoken=x=y");
    }

    #[test]
    fn test_parse_cookies_rejects_bare_names() {
        let err = parse_cookies("sessionid=abc; oops").unwrap_err();
        assert!(matches!(err, Error::InvalidCookies(entry) if entry == "oops"));
    }

    #[test]
    fn test_load_cookies_from_file_or_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies");
        fs::write(&path, "a=1; b=2\n").unwrap();

        let from_file = load_cookies(path.to_str().unwrap()).unwrap();
        assert_eq!(from_file.len(), 2);

        let inline = load_cookies("a=1").unwrap();
        assert_eq!(inline, vec![("a".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_next_page() {
        assert_eq!(
            next_page(&json!({"next": "https://example.com/?page=2", "results": []})),
            Some("https://example.com/?page=2".to_string())
        );
        assert_eq!(next_page(&json!({"next": null, "results": []})), None);
        assert_eq!(next_page(&json!({"next": "", "results": []})), None);
        assert_eq!(next_page(&json!({"results": []})), None);
    }

    #[test]
    fn test_first_page_url() {
        let config = FetchConfig::default();
        assert_eq!(
            config.first_page_url(),
            "https://learning.oreilly.com/api/v1/annotations/all/?page_size=100"
        );
    }
}
