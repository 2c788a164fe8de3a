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

//! Client library for the USGS earthquake catalog.
//!
//! This crate holds everything the desktop front end needs that does not
//! touch a widget:
//!
//! - **Query layer**: form validation and FDSN query URL construction, plus
//!   the preset summary feeds
//! - **Feed layer**: GeoJSON decoding, the mapped [`QuakeEvent`] record and
//!   marker styling by magnitude
//! - **Session layer**: fetching with memoization on the last successful URL
//!   and the scratch files the fetched data lives in
//! - **Lookup layer**: encyclopedia summaries and thumbnails for the place an
//!   event happened in
//!
//! # Quick Start
//!
//! ```no_run
//! use quake_feed::{FeedClient, FeedSession, FetchOutcome, QueryForm, ReqwestTransport};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(ReqwestTransport::new("quake-feed-example/0.1").unwrap());
//! let mut session = FeedSession::new(FeedClient::new(transport, "current_data.json"));
//!
//! let url = QueryForm::default().build_url().expect("default form is valid");
//! match session.request(&url) {
//!     Ok(FetchOutcome::Fetched(summary)) => println!("{} earthquakes were found", summary.count),
//!     Ok(FetchOutcome::Unchanged) => println!("already showing this data"),
//!     Err(e) => eprintln!("{}: {e}", e.code()),
//! }
//! ```
//!
//! # Validation
//!
//! ```
//! use quake_feed::{QueryError, QueryForm};
//!
//! let mut form = QueryForm::default();
//! form.limit.clear();
//! assert_eq!(form.build_url(), Err(QueryError::BadLimit));
//! assert_eq!(QueryError::BadLimit.code(), "Bad Limit");
//! ```

pub mod event;
pub mod feed;
pub mod http;
pub mod marker;
pub mod query;
pub mod session;
pub mod store;
pub mod wiki;

mod error;

pub use error::FeedError;
pub use event::QuakeEvent;
pub use feed::{Feature, FeatureCollection, FeedMetadata, Geometry, Properties};
pub use http::{HttpResponse, ReqwestTransport, Transport, TransportError};
pub use marker::{MagnitudeClass, MarkerStyle};
pub use query::{FeedPeriod, QueryError, QueryForm, SearchArea, SummaryFeed, TimeZone};
pub use session::{load_events, FeedClient, FeedSession, FeedSummary, FetchOutcome, LoadedFeed};
pub use store::SessionFiles;
pub use wiki::{search_candidates, Article, WikiClient};
