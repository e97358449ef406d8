use crate::curator::QueryFetcher;
use crate::model::SearchResult;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::Agent;

const DEFAULT_BASE_URL: &str = "https://commons.wikimedia.org/w/api.php";
const USER_AGENT: &str = concat!("guster-web/", env!("CARGO_PKG_VERSION"));

/// Client for the Wikimedia Commons search API (file namespace).
#[derive(Clone)]
pub struct WikimediaClient {
    agent: Agent,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<QueryBlock>,
}

#[derive(Debug, Deserialize)]
struct QueryBlock {
    // BTreeMap keeps page iteration order stable across runs, which the
    // pipeline's first-seen tie-breaking depends on.
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    imageinfo: Vec<ImageInfo>,
}

#[derive(Debug, Deserialize)]
struct ImageInfo {
    url: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    mime: String,
}

impl WikimediaClient {
    pub fn new(timeout: Duration) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), timeout)
    }

    pub fn with_base_url(base_url: String, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, base_url }
    }

    /// Run one full-text search against the file namespace and return every
    /// page that carries image metadata.
    pub fn search_images(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        let mut resp = self
            .agent
            .get(&self.base_url)
            .query("action", "query")
            .query("format", "json")
            .query("generator", "search")
            .query("gsrnamespace", "6")
            .query("gsrsearch", query)
            .query("gsrlimit", &limit.to_string())
            .query("prop", "imageinfo")
            .query("iiprop", "url|size|mime")
            .query("origin", "*")
            .header("User-Agent", USER_AGENT)
            .call()
            .context("Failed to search Wikimedia Commons")?;

        let search_resp: SearchResponse = resp
            .body_mut()
            .read_json()
            .context("Failed to parse Wikimedia Commons response")?;

        Ok(collect_results(search_resp))
    }
}

fn collect_results(resp: SearchResponse) -> Vec<SearchResult> {
    let Some(query) = resp.query else {
        return Vec::new();
    };

    let mut results = Vec::new();
    for page in query.pages.into_values() {
        let Some(info) = page.imageinfo.into_iter().next() else {
            continue;
        };
        let Some(url) = info.url.filter(|url| !url.is_empty()) else {
            continue;
        };
        results.push(SearchResult {
            title: page.title,
            image_url: url,
            mime: info.mime,
            width: info.width,
            height: info.height,
        });
    }
    results
}

impl QueryFetcher for WikimediaClient {
    fn fetch(&self, query: &str, limit: u32) -> Result<Vec<SearchResult>> {
        self.search_images(query, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WikimediaClient::new(Duration::from_secs(5));
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_collect_results_extracts_pages_in_key_order() {
        let payload = r#"{"query":{"pages":{
            "2":{"title":"File:B.jpg","imageinfo":[{"url":"https://b.jpg","mime":"image/jpeg","width":2000,"height":1300}]},
            "1":{"title":"File:A.jpg","imageinfo":[{"url":"https://a.jpg","mime":"image/jpeg","width":2400,"height":1600}]}
        }}}"#;
        let resp: SearchResponse = serde_json::from_str(payload).unwrap();

        let results = collect_results(resp);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "File:A.jpg");
        assert_eq!(results[0].image_url, "https://a.jpg");
        assert_eq!(results[0].width, 2400);
        assert_eq!(results[1].image_url, "https://b.jpg");
    }

    #[test]
    fn test_collect_results_skips_pages_without_usable_imageinfo() {
        let payload = r#"{"query":{"pages":{
            "1":{"title":"File:NoInfo.jpg"},
            "2":{"title":"File:NoUrl.jpg","imageinfo":[{"mime":"image/jpeg"}]},
            "3":{"title":"File:Ok.jpg","imageinfo":[{"url":"https://ok.jpg"}]}
        }}}"#;
        let resp: SearchResponse = serde_json::from_str(payload).unwrap();

        let results = collect_results(resp);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].image_url, "https://ok.jpg");
        // Missing metadata deserializes to empty/zero and is left for the
        // quality gate to reject.
        assert_eq!(results[0].mime, "");
        assert_eq!(results[0].width, 0);
    }

    #[test]
    fn test_collect_results_handles_missing_query_block() {
        let resp: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(collect_results(resp).is_empty());
    }
}
