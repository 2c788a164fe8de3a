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

//! Background network jobs.
//!
//! Each job runs on its own short-lived thread with blocking HTTP, and its
//! result comes back to the UI thread over a channel. The UI drains the
//! channel once per frame; a result nobody is waiting for any more is simply
//! dropped by the receiver.

use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;
use log::{debug, warn};
use quake_feed::{Article, FeedClient, FeedError, FeedSummary, SessionFiles, WikiClient};

/// Finished job, tagged with what it was for.
#[derive(Debug)]
pub enum JobResult {
    Feed {
        url: String,
        result: Result<FeedSummary, FeedError>,
    },
    Article {
        event_id: String,
        result: Result<Option<Article>, FeedError>,
    },
    Image {
        event_id: String,
        result: Result<Vec<u8>, FeedError>,
    },
}

#[derive(Debug)]
pub struct Workers {
    feed: FeedClient,
    wiki: WikiClient,
    files: SessionFiles,
    tx: Sender<JobResult>,
    rx: Receiver<JobResult>,
    pending_feed: Option<String>,
}

impl Workers {
    pub fn new(feed: FeedClient, wiki: WikiClient, files: SessionFiles) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            feed,
            wiki,
            files,
            tx,
            rx,
            pending_feed: None,
        }
    }

    /// URL of the feed download in progress, if any
    pub fn pending_feed(&self) -> Option<&str> {
        self.pending_feed.as_deref()
    }

    /// Start downloading `url`. Only one download runs at a time, since
    /// every download rewrites the same data file; returns false if one is
    /// already running.
    pub fn fetch_feed(&mut self, url: &str, ctx: &egui::Context) -> bool {
        if let Some(pending) = &self.pending_feed {
            debug!("Not fetching {url}, {pending} is still in progress");
            return false;
        }
        self.pending_feed = Some(url.to_string());

        let client = self.feed.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        let url = url.to_string();
        std::thread::spawn(move || {
            let result = client.fetch(&url);
            let _ = tx.send(JobResult::Feed { url, result });
            ctx.request_repaint();
        });
        true
    }

    /// Look up the encyclopedia article for `place`, then its thumbnail.
    pub fn lookup_place(&self, event_id: &str, place: &str, ctx: &egui::Context) {
        let wiki = self.wiki.clone();
        let files = self.files.clone();
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        let event_id = event_id.to_string();
        let place = place.to_string();

        std::thread::spawn(move || {
            let result = wiki.lookup(&place);
            let thumbnail = result
                .as_ref()
                .ok()
                .and_then(Option::as_ref)
                .and_then(|article| article.thumbnail_url.clone());

            let _ = tx.send(JobResult::Article {
                event_id: event_id.clone(),
                result,
            });
            ctx.request_repaint();

            if let Some(url) = thumbnail {
                let result = fetch_thumbnail(&wiki, &files, &url);
                let _ = tx.send(JobResult::Image { event_id, result });
                ctx.request_repaint();
            }
        });
    }

    /// Drain finished jobs without blocking
    pub fn poll(&mut self) -> Vec<JobResult> {
        let results: Vec<JobResult> = self.rx.try_iter().collect();
        for result in &results {
            if let JobResult::Feed { url, .. } = result {
                if self.pending_feed.as_deref() == Some(url.as_str()) {
                    self.pending_feed = None;
                }
            }
        }
        results
    }
}

/// Session copy if there is one, otherwise download and keep it.
fn fetch_thumbnail(wiki: &WikiClient, files: &SessionFiles, url: &str) -> Result<Vec<u8>, FeedError> {
    if let Some(bytes) = files.cached_image(url) {
        debug!("Using stored thumbnail for {url}");
        return Ok(bytes);
    }

    let bytes = wiki.download_image(url)?;
    if let Err(e) = files.store_image(url, &bytes) {
        warn!("Failed to store thumbnail: {e}");
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::StubTransport;

    fn wait_for(workers: &mut Workers, n: usize) -> Vec<JobResult> {
        let mut out = Vec::new();
        crate::testing::wait_until(|| {
            out.extend(workers.poll());
            out.len() >= n
        });
        out
    }

    fn setup(bodies: &[(&str, &[u8])]) -> (tempfile::TempDir, Arc<StubTransport>, Workers) {
        let tmp = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::with_bodies(bodies));
        let files = SessionFiles::new(tmp.path()).unwrap();
        let feed = FeedClient::new(stub.clone(), files.data_path());
        let wiki = WikiClient::new(stub.clone());
        (tmp, stub, Workers::new(feed, wiki, files))
    }

    #[test]
    fn test_feed_job_reports_and_clears_pending() {
        let url = "https://example.org/feed.geojson";
        let (_tmp, _stub, mut workers) = setup(&[(url, br#"{"metadata":{"count":0},"features":[]}"#)]);
        let ctx = egui::Context::default();

        assert!(workers.fetch_feed(url, &ctx));
        assert!(!workers.fetch_feed("https://example.org/other.geojson", &ctx));
        assert_eq!(workers.pending_feed(), Some(url));

        let results = wait_for(&mut workers, 1);
        assert!(matches!(
            &results[0],
            JobResult::Feed { url: u, result: Ok(summary) } if u == url && summary.count == 0
        ));
        assert_eq!(workers.pending_feed(), None);
    }

    #[test]
    fn test_lookup_without_locality_reports_nothing_found() {
        let (_tmp, stub, mut workers) = setup(&[]);
        let ctx = egui::Context::default();

        workers.lookup_place("ev1", "Southern Alaska", &ctx);
        let results = wait_for(&mut workers, 1);
        assert!(matches!(
            &results[0],
            JobResult::Article { event_id, result: Ok(None) } if event_id == "ev1"
        ));
        assert!(stub.calls().is_empty());
    }

    #[test]
    fn test_thumbnail_stored_in_session() {
        let thumb = "https://upload.example/Alaska.png";
        let tmp = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubTransport::with_bodies(&[(thumb, b"not really a png")]));
        let files = SessionFiles::new(tmp.path()).unwrap();
        let wiki = WikiClient::new(stub.clone());

        let first = fetch_thumbnail(&wiki, &files, thumb).unwrap();
        let second = fetch_thumbnail(&wiki, &files, thumb).unwrap();
        assert_eq!(first, second);
        assert_eq!(stub.calls().len(), 1);
        assert!(files.image_path(thumb).exists());
    }
}
