//! Synchronous client for the **PokeAPI (v2)**.
//!
//! This module walks the paginated index of an endpoint (`{base}/{endpoint}?limit=N`,
//! following the envelope's `next` link) and fetches raw detail documents as
//! `serde_json::Value`. Flattening lives in [`crate::endpoints`].
//!
//! ### Notes
//! - Listing is best effort: a failed page stops pagination and the refs gathered so far
//!   are returned.
//! - A fixed courtesy delay is slept before every request; there is no retry or backoff.
//! - Network timeouts use a sane default (30s) and can be adjusted by editing the client builder.
//!
//! Typical usage:
//! ```no_run
//! # use pokeapi_csv::{api, Client};
//! # use std::time::Duration;
//! let client = Client::default();
//! let url = api::index_url(&client.base_url, "pokemon", 1000);
//! let refs = api::list_resources(&client, &url, Duration::from_millis(100));
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::models::{ResourcePage, ResourceRef};
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Safety cap to avoid pathological jobs.
pub const MAX_PAGES: usize = 1000;

/// Anything that can answer a GET with a JSON document.
///
/// [`Client`] is the real implementation; tests plug in canned responses.
pub trait JsonSource {
    fn get_json(&self, url: &str) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl Client {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10)) // connect timeout
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("pokeapi_csv/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Fetch the API root and return its endpoint directory (`name -> url`).
    ///
    /// ### Example
    /// ```no_run
    /// # use pokeapi_csv::Client;
    /// let cli = Client::default();
    /// for (name, url) in cli.list_endpoints()? {
    ///     println!("{name:20} -> {url}");
    /// }
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn list_endpoints(&self) -> Result<BTreeMap<String, String>> {
        let url = format!("{}/", self.base_url);
        let v = self.get_json(&url)?;
        serde_json::from_value(v).context("parse endpoint directory")
    }
}

impl JsonSource for Client {
    fn get_json(&self, url: &str) -> Result<Value> {
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        if !resp.status().is_success() {
            bail!("request failed with HTTP {}", resp.status());
        }
        resp.json().context("decode json")
    }
}

// Endpoint names are plain slugs; keep `-` unescaped (e.g. `pokemon-species`).
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

/// First page URL of an endpoint index.
pub fn index_url(base_url: &str, endpoint: &str, limit: u32) -> String {
    format!(
        "{}/{}?limit={}",
        base_url.trim_end_matches('/'),
        percent_encoding::utf8_percent_encode(endpoint.trim(), SAFE),
        limit
    )
}

/// Walk an index starting at `first_url` until the envelope's `next` is empty.
///
/// Never fails: a page that cannot be fetched or decoded is logged and ends the walk,
/// returning the references gathered so far.
pub fn list_resources<S: JsonSource + ?Sized>(
    source: &S,
    first_url: &str,
    delay: Duration,
) -> Vec<ResourceRef> {
    let mut out: Vec<ResourceRef> = Vec::new();
    let mut next = Some(first_url.to_string());
    let mut pages = 0usize;

    while let Some(url) = next.take() {
        if pages >= MAX_PAGES {
            warn!("page limit exceeded ({}), stopping at {}", MAX_PAGES, url);
            break;
        }
        pages += 1;
        std::thread::sleep(delay);

        let page = source.get_json(&url).and_then(|v| {
            serde_json::from_value::<ResourcePage>(v).context("parse resource page")
        });
        match page {
            Ok(page) => {
                debug!("{}: {} refs (total {})", url, page.results.len(), page.count);
                out.extend(page.results);
                next = page.next.filter(|n| !n.trim().is_empty());
            }
            Err(e) => {
                warn!("error listing {}: {:#}", url, e);
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct Pages(HashMap<String, Value>);

    impl JsonSource for Pages {
        fn get_json(&self, url: &str) -> Result<Value> {
            self.0
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("request failed with HTTP 404 Not Found"))
        }
    }

    fn page(next: Option<&str>, names: &[&str]) -> Value {
        json!({
            "count": 3,
            "next": next,
            "previous": null,
            "results": names
                .iter()
                .map(|n| json!({"name": n, "url": format!("http://mock/thing/{n}/")}))
                .collect::<Vec<_>>(),
        })
    }

    #[test]
    fn index_url_has_limit() {
        assert_eq!(
            index_url("https://pokeapi.co/api/v2/", "pokemon", 1000),
            "https://pokeapi.co/api/v2/pokemon?limit=1000"
        );
    }

    #[test]
    fn follows_next_until_exhausted() {
        let mut m = HashMap::new();
        m.insert("p1".to_string(), page(Some("p2"), &["a", "b"]));
        m.insert("p2".to_string(), page(None, &["c"]));
        let refs = list_resources(&Pages(m), "p1", Duration::ZERO);
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn failed_page_keeps_partial_result() {
        let mut m = HashMap::new();
        m.insert("p1".to_string(), page(Some("missing"), &["a", "b"]));
        let refs = list_resources(&Pages(m), "p1", Duration::ZERO);
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn self_referencing_next_stops_at_cap() {
        let mut m = HashMap::new();
        m.insert("loop".to_string(), page(Some("loop"), &["x"]));
        let refs = list_resources(&Pages(m), "loop", Duration::ZERO);
        assert_eq!(refs.len(), MAX_PAGES);
    }
}
