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

use std::path::PathBuf;

use thiserror::Error;

use crate::http::TransportError;

/// Errors raised while fetching, storing or decoding feed data.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("a request could not be made: {0}")]
    Connection(String),

    #[error("the server answered with HTTP {status}")]
    Server { status: u16 },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feature {0} has no usable coordinates")]
    MissingGeometry(String),
}

impl FeedError {
    /// Short rejection code, stable across releases.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            FeedError::Connection(_) => "Bad Connection",
            FeedError::Server { .. } => "Bad Response",
            FeedError::Decode(_) => "Bad Data",
            FeedError::Io { .. } => "Bad File",
            FeedError::MissingGeometry(_) => "Bad Geometry",
        }
    }

    /// Title for the dialog that reports this error.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            FeedError::Connection(_) => "Connection Error",
            FeedError::Server { .. } | FeedError::Decode(_) => "Server Error",
            FeedError::Io { .. } | FeedError::MissingGeometry(_) => "Data Error",
        }
    }

    /// Message shown to the user. Kept separate from `Display`, which is
    /// aimed at the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FeedError::Connection(_) => {
                "Please check your internet connection\nas a request could not be made".to_string()
            }
            FeedError::Server { .. } => {
                "There was an error in retrieving the data\nThe data collection service could be down right now"
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FeedError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<TransportError> for FeedError {
    fn from(err: TransportError) -> Self {
        FeedError::Connection(err.to_string())
    }
}
