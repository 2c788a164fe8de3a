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

//! Fetching feed data, memoized on the last successful URL.
//!
//! [`FeedClient`] does the network and disk work and is cheap to clone into
//! a worker thread. [`FeedSession`] adds the one piece of shared state the
//! application has: the URL of the data set currently on disk.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};

use crate::event::QuakeEvent;
use crate::feed::FeatureCollection;
use crate::http::Transport;
use crate::FeedError;

/// Result of a successful download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    pub url: String,
    /// Number of events the service reported
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The URL was already current; nothing was requested.
    Unchanged,
    Fetched(FeedSummary),
}

/// Downloads feed data and writes it to the session data file.
#[derive(Clone)]
pub struct FeedClient {
    transport: Arc<dyn Transport>,
    data_path: PathBuf,
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("data_path", &self.data_path)
            .finish_non_exhaustive()
    }
}

impl FeedClient {
    pub fn new(transport: Arc<dyn Transport>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            transport,
            data_path: data_path.into(),
        }
    }

    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// GET `url`, check that the body decodes as a feed, and store it.
    ///
    /// The data file is only replaced once the body has decoded, so a failed
    /// fetch leaves the previous data set intact. The replacement is a rename
    /// of a finished file, so readers never see a partly written data set.
    pub fn fetch(&self, url: &str) -> Result<FeedSummary, FeedError> {
        info!("Fetching earthquake data from {url}");

        let response = self.transport.get(url).inspect_err(|e| {
            warn!("Request to {url} failed: {e}");
        })?;

        if !response.is_success() {
            warn!("Request to {url} returned HTTP {}", response.status);
            return Err(FeedError::Server {
                status: response.status,
            });
        }

        let collection = FeatureCollection::from_slice(&response.body)?;

        replace_file(&self.data_path, &response.body)?;

        info!("{} earthquakes were found", collection.metadata.count);
        Ok(FeedSummary {
            url: url.to_string(),
            count: collection.metadata.count,
        })
    }
}

/// Write `bytes` next to `path` and rename the result over it.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), FeedError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| FeedError::io(dir, e))?;
    staged
        .write_all(bytes)
        .map_err(|e| FeedError::io(staged.path(), e))?;
    staged
        .persist(path)
        .map_err(|e| FeedError::io(path, e.error))?;
    Ok(())
}

/// A [`FeedClient`] plus the URL of the data currently on disk.
#[derive(Debug, Clone)]
pub struct FeedSession {
    client: FeedClient,
    current_url: Option<String>,
}

impl FeedSession {
    #[must_use]
    pub fn new(client: FeedClient) -> Self {
        Self {
            client,
            current_url: None,
        }
    }

    #[must_use]
    pub fn client(&self) -> &FeedClient {
        &self.client
    }

    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// False when `url` is the data set already on disk.
    #[must_use]
    pub fn needs_fetch(&self, url: &str) -> bool {
        self.current_url.as_deref() != Some(url)
    }

    /// Record `url` as the data set now on disk. Only call this after a
    /// successful [`FeedClient::fetch`] of the same URL.
    pub fn mark_current(&mut self, url: &str) {
        self.current_url = Some(url.to_string());
    }

    /// Fetch `url` unless it is already current.
    pub fn request(&mut self, url: &str) -> Result<FetchOutcome, FeedError> {
        if !self.needs_fetch(url) {
            return Ok(FetchOutcome::Unchanged);
        }

        let summary = self.client.fetch(url)?;
        self.mark_current(url);
        Ok(FetchOutcome::Fetched(summary))
    }
}

/// Events read back from the session data file.
#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub count: u64,
    pub events: Vec<QuakeEvent>,
    /// Features dropped for lacking coordinates
    pub skipped: usize,
}

/// Read the data file at `path` and map every feature to a [`QuakeEvent`].
pub fn load_events(path: &Path) -> Result<LoadedFeed, FeedError> {
    let bytes = fs::read(path).map_err(|e| FeedError::io(path, e))?;
    let collection = FeatureCollection::from_slice(&bytes)?;

    let mut events = Vec::with_capacity(collection.features.len());
    let mut skipped = 0;
    for feature in &collection.features {
        match QuakeEvent::from_feature(feature) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!("Skipping feature: {e}");
                skipped += 1;
            }
        }
    }

    Ok(LoadedFeed {
        count: collection.metadata.count,
        events,
        skipped,
    })
}
