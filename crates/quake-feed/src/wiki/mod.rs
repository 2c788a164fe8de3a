// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Encyclopedia summaries for the place an event happened in.
//!
//! USGS place names look like `"75km S of Kobuk, Alaska"`. The distance and
//! bearing are dropped and the remainder is looked up on Wikipedia, falling
//! back to the region after the first comma when the town itself has no
//! usable article.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::http::Transport;
use crate::FeedError;

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const ARTICLE_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Thumbnail width requested from the API, in pixels.
pub const THUMBNAIL_SIZE: u32 = 300;

const DISAMBIGUATION_MARKERS: [&str; 2] = ["may refer to:", "may also refer to:"];

/// Disambiguation pages that lead with a primary topic.
const PRIMARY_TOPIC_MARKER: &str = "commonly refers to:";

/// Summary of the article found for a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub thumbnail_url: Option<String>,
}

impl Article {
    /// Browser URL of the full article.
    #[must_use]
    pub fn page_url(&self) -> String {
        format!("{ARTICLE_BASE_URL}{}", self.title.replace(' ', "_"))
    }
}

/// Titles to try for `place`, most specific first.
///
/// Only places that start with a distance (`"75km S of ..."`) name a
/// locality; anything else (`"Southern Alaska"`, `"off the coast of ..."`)
/// yields nothing.
#[must_use]
pub fn search_candidates(place: &str) -> Vec<String> {
    let words: Vec<&str> = place.split_whitespace().collect();
    let starts_with_distance = words
        .first()
        .and_then(|w| w.chars().next())
        .is_some_and(|c| c.is_ascii_digit());
    if !starts_with_distance || words.len() <= 3 {
        return Vec::new();
    }

    let locality = words[3..].join(" ");
    let mut candidates = vec![locality.clone()];
    if let Some((_, region)) = locality.split_once(',') {
        let region = region.trim();
        if !region.is_empty() {
            candidates.push(region.to_string());
        }
    }
    candidates
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    title: String,
    #[serde(default)]
    missing: Option<serde_json::Value>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    thumbnail: Option<Thumbnail>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    title: String,
}

/// What a single title resolved to.
enum Resolved {
    Article(Article),
    /// A disambiguation page whose primary topic is this title.
    PrimaryTopic(String),
    Nothing,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: String,
}

/// MediaWiki API client.
#[derive(Clone)]
pub struct WikiClient {
    transport: Arc<dyn Transport>,
    api_url: String,
}

impl std::fmt::Debug for WikiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WikiClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl WikiClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_api_url(transport, DEFAULT_API_URL)
    }

    pub fn with_api_url(transport: Arc<dyn Transport>, api_url: impl Into<String>) -> Self {
        Self {
            transport,
            api_url: api_url.into(),
        }
    }

    /// Intro extract and thumbnail for `title`, following redirects.
    #[must_use]
    pub fn query_url(&self, title: &str) -> String {
        let thumb = THUMBNAIL_SIZE.to_string();
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("prop", "extracts|pageimages"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("pithumbsize", thumb.as_str()),
            ("titles", title),
        ];
        match reqwest::Url::parse_with_params(&self.api_url, &params) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!("Invalid encyclopedia endpoint {}: {e}", self.api_url);
                self.api_url.clone()
            }
        }
    }

    /// Article links of `title`, used to resolve a primary topic.
    #[must_use]
    pub fn links_url(&self, title: &str) -> String {
        let params = [
            ("action", "query"),
            ("format", "json"),
            ("prop", "links"),
            ("plnamespace", "0"),
            ("pllimit", "max"),
            ("redirects", "1"),
            ("titles", title),
        ];
        match reqwest::Url::parse_with_params(&self.api_url, &params) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!("Invalid encyclopedia endpoint {}: {e}", self.api_url);
                self.api_url.clone()
            }
        }
    }

    /// Find an article for `place`, trying each search candidate in turn.
    ///
    /// `Ok(None)` means no candidate produced a usable article. Connection
    /// failures abort the search; other failures move on to the next
    /// candidate.
    pub fn lookup(&self, place: &str) -> Result<Option<Article>, FeedError> {
        let candidates = search_candidates(place);
        if candidates.is_empty() {
            debug!("No searchable locality in {place:?}");
            return Ok(None);
        }

        for candidate in &candidates {
            match self.fetch_article(candidate) {
                Ok(Some(article)) => {
                    info!("Found article {:?} for {place:?}", article.title);
                    return Ok(Some(article));
                }
                Ok(None) => debug!("No usable article for {candidate:?}"),
                Err(e @ FeedError::Connection(_)) => return Err(e),
                Err(e) => warn!("Lookup of {candidate:?} failed: {e}"),
            }
        }

        Ok(None)
    }

    /// Article for `title`, following a "commonly refers to" page to its
    /// primary topic once.
    fn fetch_article(&self, title: &str) -> Result<Option<Article>, FeedError> {
        match self.resolve(title)? {
            Resolved::Article(article) => Ok(Some(article)),
            Resolved::PrimaryTopic(primary) => {
                debug!("{title:?} commonly refers to {primary:?}");
                match self.resolve(&primary)? {
                    Resolved::Article(article) => Ok(Some(article)),
                    Resolved::PrimaryTopic(_) | Resolved::Nothing => Ok(None),
                }
            }
            Resolved::Nothing => Ok(None),
        }
    }

    fn resolve(&self, title: &str) -> Result<Resolved, FeedError> {
        let Some(page) = self.fetch_page(&self.query_url(title))? else {
            return Ok(Resolved::Nothing);
        };

        let extract = page.extract.unwrap_or_default();
        if extract.contains(PRIMARY_TOPIC_MARKER) {
            let links = self
                .fetch_page(&self.links_url(&page.title))?
                .map(|p| p.links)
                .unwrap_or_default();
            let titles: Vec<String> = links.into_iter().map(|l| l.title).collect();
            return Ok(match primary_link(&extract, &titles) {
                Some(primary) => Resolved::PrimaryTopic(primary.to_string()),
                None => {
                    debug!("{:?} names no linked primary topic", page.title);
                    Resolved::Nothing
                }
            });
        }
        if DISAMBIGUATION_MARKERS.iter().any(|m| extract.contains(m)) {
            debug!("{:?} is a disambiguation page", page.title);
            return Ok(Resolved::Nothing);
        }

        let summary = clean_extract(&extract);
        if summary.is_empty() {
            return Ok(Resolved::Nothing);
        }

        Ok(Resolved::Article(Article {
            title: page.title,
            summary,
            thumbnail_url: page.thumbnail.map(|t| t.source),
        }))
    }

    /// The single page a one-title query returns, if it exists.
    fn fetch_page(&self, url: &str) -> Result<Option<Page>, FeedError> {
        let response = self.transport.get(url)?;
        if !response.is_success() {
            return Err(FeedError::Server {
                status: response.status,
            });
        }

        let parsed: QueryResponse = serde_json::from_slice(&response.body)?;
        let Some(body) = parsed.query else {
            return Ok(None);
        };

        // One title in, at most one page out
        let Some((id, page)) = body.pages.into_iter().next() else {
            return Ok(None);
        };
        if page.missing.is_some() || id.starts_with('-') {
            return Ok(None);
        }
        Ok(Some(page))
    }

    /// Download the bytes of a thumbnail.
    pub fn download_image(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        let response = self.transport.get(url)?;
        if !response.is_success() {
            return Err(FeedError::Server {
                status: response.status,
            });
        }
        Ok(response.body)
    }
}

/// Title of the primary topic a "commonly refers to" extract leads with.
///
/// The first entry after the marker starts with the topic's title, which is
/// matched against the page's article links. The longest match wins so that
/// `"Kobuk, Alaska, a city"` resolves to `Kobuk, Alaska` rather than `Kobuk`.
fn primary_link<'a>(extract: &str, links: &'a [String]) -> Option<&'a str> {
    let (_, after) = extract.split_once(PRIMARY_TOPIC_MARKER)?;
    let entry = after.lines().map(str::trim).find(|l| !l.is_empty())?;
    links
        .iter()
        .map(String::as_str)
        .filter(|title| !title.is_empty() && entry.starts_with(title))
        .max_by_key(|title| title.len())
}

/// Drop citation markers like `[12]` and blank lines, and join paragraphs
/// with a single empty line.
fn clean_extract(text: &str) -> String {
    text.lines()
        .map(strip_citations)
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn strip_citations(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if close > 0 && after[..close].bytes().all(|b| b.is_ascii_digit()) => {
                out.push_str(&rest[..open]);
                rest = &after[close + 1..];
            }
            _ => {
                out.push_str(&rest[..=open]);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    fn client_with(build: impl FnOnce(&WikiClient, MockTransport) -> MockTransport) -> (Arc<MockTransport>, WikiClient) {
        let urls = WikiClient::new(Arc::new(MockTransport::new()));
        let mock = Arc::new(build(&urls, MockTransport::new()));
        (mock.clone(), WikiClient::new(mock))
    }

    fn page(title: &str, extract: &str, thumb: Option<&str>) -> String {
        let thumbnail = thumb
            .map(|t| format!(r#","thumbnail":{{"source":"{t}","width":300,"height":200}}"#))
            .unwrap_or_default();
        format!(
            r#"{{"batchcomplete":"","query":{{"pages":{{"42":{{"pageid":42,"ns":0,"title":"{title}","extract":"{extract}"{thumbnail}}}}}}}}}"#
        )
    }

    const MISSING: &str = r#"{"batchcomplete":"","query":{"pages":{"-1":{"ns":0,"title":"Nowhere","missing":""}}}}"#;

    #[test]
    fn test_search_candidates() {
        assert_eq!(
            search_candidates("75km S of Kobuk, Alaska"),
            vec!["Kobuk, Alaska".to_string(), "Alaska".to_string()]
        );
        assert_eq!(
            search_candidates("5 km NNE of Salamanca, Chile"),
            vec!["Salamanca, Chile".to_string(), "Chile".to_string()]
        );
        assert_eq!(search_candidates("12km W of Volcano"), vec!["Volcano".to_string()]);
        assert!(search_candidates("Southern Alaska").is_empty());
        assert!(search_candidates("10km S of").is_empty());
        assert!(search_candidates("").is_empty());
    }

    #[test]
    fn test_query_url_encodes_title() {
        let client = WikiClient::new(Arc::new(MockTransport::new()));
        let url = client.query_url("Kobuk, Alaska");
        assert!(url.starts_with("https://en.wikipedia.org/w/api.php?action=query&format=json"));
        assert!(url.contains("pithumbsize=300"));
        assert!(url.contains("titles=Kobuk%2C+Alaska"));
    }

    #[test]
    fn test_lookup_first_candidate() {
        let (mock, client) = client_with(|urls, m| {
            m.with(
                &urls.query_url("Kobuk, Alaska"),
                200,
                &page("Kobuk, Alaska", "Kobuk is a city.[1] It lies on the river.", Some("https://upload.example/Kobuk.jpg")),
            )
        });

        let article = client.lookup("75km S of Kobuk, Alaska").unwrap().unwrap();
        assert_eq!(article.title, "Kobuk, Alaska");
        assert_eq!(article.summary, "Kobuk is a city. It lies on the river.");
        assert_eq!(article.thumbnail_url.as_deref(), Some("https://upload.example/Kobuk.jpg"));
        assert_eq!(article.page_url(), "https://en.wikipedia.org/wiki/Kobuk,_Alaska");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_lookup_falls_back_to_region() {
        let (mock, client) = client_with(|urls, m| {
            m.with(&urls.query_url("Kobuk, Alaska"), 200, MISSING)
                .with(&urls.query_url("Alaska"), 200, &page("Alaska", "Alaska is a state.", None))
        });

        let article = client.lookup("75km S of Kobuk, Alaska").unwrap().unwrap();
        assert_eq!(article.title, "Alaska");
        assert!(article.thumbnail_url.is_none());
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_disambiguation_page_skipped() {
        let (_mock, client) = client_with(|urls, m| {
            m.with(
                &urls.query_url("Salamanca, Chile"),
                200,
                &page("Salamanca", "Salamanca may refer to:", None),
            )
            .with(&urls.query_url("Chile"), 200, &page("Chile", "Chile is a country.", None))
        });

        let article = client.lookup("3km E of Salamanca, Chile").unwrap().unwrap();
        assert_eq!(article.title, "Chile");
    }

    #[test]
    fn test_primary_topic_followed() {
        let links = r#"{"query":{"pages":{"7":{"pageid":7,"ns":0,"title":"Kobuk","links":[{"ns":0,"title":"Alaska"},{"ns":0,"title":"Kobuk"},{"ns":0,"title":"Kobuk River"},{"ns":0,"title":"Kobuk, Alaska"}]}}}}"#;
        let (mock, client) = client_with(|urls, m| {
            m.with(
                &urls.query_url("Kobuk, Alaska"),
                200,
                &page(
                    "Kobuk",
                    "Kobuk commonly refers to:\\nKobuk River, a river in Alaska\\nKobuk may also refer to:\\nKobuk, Alaska, a city",
                    None,
                ),
            )
            .with(&urls.links_url("Kobuk"), 200, links)
            .with(
                &urls.query_url("Kobuk River"),
                200,
                &page("Kobuk River", "The Kobuk River flows west.", Some("https://upload.example/River.jpg")),
            )
        });

        let article = client.lookup("75km S of Kobuk, Alaska").unwrap().unwrap();
        assert_eq!(article.title, "Kobuk River");
        assert_eq!(article.summary, "The Kobuk River flows west.");
        assert_eq!(mock.call_count(), 3);
    }

    #[test]
    fn test_primary_topic_without_link_falls_back() {
        let (_mock, client) = client_with(|urls, m| {
            m.with(
                &urls.query_url("Kobuk, Alaska"),
                200,
                &page("Kobuk", "Kobuk commonly refers to:\\nSomething unlinked", None),
            )
            .with(&urls.links_url("Kobuk"), 200, r#"{"query":{"pages":{"7":{"pageid":7,"ns":0,"title":"Kobuk"}}}}"#)
            .with(&urls.query_url("Alaska"), 200, &page("Alaska", "Alaska is a state.", None))
        });

        let article = client.lookup("75km S of Kobuk, Alaska").unwrap().unwrap();
        assert_eq!(article.title, "Alaska");
    }

    #[test]
    fn test_primary_link_longest_match() {
        let links = vec!["Alaska".to_string(), "Kobuk".to_string(), "Kobuk, Alaska".to_string()];
        assert_eq!(
            primary_link("Kobuk commonly refers to:\n\nKobuk, Alaska, a city", &links),
            Some("Kobuk, Alaska")
        );
        assert_eq!(primary_link("Kobuk commonly refers to: Kobuk River", &links), Some("Kobuk"));
        assert_eq!(primary_link("Kobuk commonly refers to:\nYukon", &links), None);
        assert_eq!(primary_link("Kobuk may refer to:\nKobuk, Alaska", &links), None);
    }

    #[test]
    fn test_server_error_tries_next_candidate() {
        let (_mock, client) = client_with(|urls, m| {
            m.with(&urls.query_url("Alaska"), 200, &page("Alaska", "Alaska is a state.", None))
        });
        // First candidate is unregistered and answers 400
        let article = client.lookup("75km S of Kobuk, Alaska").unwrap().unwrap();
        assert_eq!(article.title, "Alaska");
    }

    #[test]
    fn test_connection_failure_aborts() {
        let (mock, client) = client_with(|urls, m| m.unreachable(&urls.query_url("Kobuk, Alaska")));
        let err = client.lookup("75km S of Kobuk, Alaska").unwrap_err();
        assert_eq!(err.code(), "Bad Connection");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_nothing_found() {
        let (mock, client) = client_with(|urls, m| {
            m.with(&urls.query_url("Kobuk, Alaska"), 200, MISSING)
                .with(&urls.query_url("Alaska"), 200, r#"{"error":{"code":"badvalue"}}"#)
        });
        assert_eq!(client.lookup("75km S of Kobuk, Alaska").unwrap(), None);
        assert_eq!(client.lookup("Southern Alaska").unwrap(), None);
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_download_image() {
        let (_mock, client) = client_with(|_, m| m.with_bytes("https://upload.example/a.png", &[1, 2, 3]));
        assert_eq!(client.download_image("https://upload.example/a.png").unwrap(), vec![1, 2, 3]);
        assert!(client.download_image("https://upload.example/missing.png").is_err());
    }

    #[test]
    fn test_clean_extract() {
        assert_eq!(
            clean_extract("First[1] paragraph.[23]\n\n\nSecond [a] one [].\n"),
            "First paragraph.\n\nSecond [a] one []."
        );
    }
}
