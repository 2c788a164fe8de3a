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

//! The mapped event record attached to every plotted marker.

use chrono::{DateTime, Local, Utc};

use crate::feed::Feature;
use crate::marker::MarkerStyle;
use crate::FeedError;

/// Latitude limit of the Web Mercator map the events are drawn on.
pub const MAX_PLOT_LATITUDE: f64 = 85.0;

/// One earthquake, with its attributes copied verbatim from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeEvent {
    pub id: String,
    pub title: String,
    pub place: String,
    pub time: Option<DateTime<Utc>>,
    pub magnitude: Option<f64>,
    pub felt: Option<u64>,
    pub cdi: Option<f64>,
    pub mmi: Option<f64>,
    pub alert: Option<String>,
    pub tsunami: bool,
    pub sig: Option<i64>,
    pub status: String,
    pub dmin: Option<f64>,
    pub gap: Option<f64>,
    pub mag_type: Option<String>,
    pub event_type: String,
    pub url: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub depth: Option<f64>,
}

impl QuakeEvent {
    pub fn from_feature(feature: &Feature) -> Result<Self, FeedError> {
        let geometry = &feature.geometry;
        let (Some(longitude), Some(latitude)) = (geometry.longitude(), geometry.latitude()) else {
            return Err(FeedError::MissingGeometry(feature.id.clone()));
        };

        let props = &feature.properties;
        Ok(Self {
            id: feature.id.clone(),
            title: props.title.clone().unwrap_or_default(),
            place: props.place.clone().unwrap_or_default(),
            time: props.time.and_then(DateTime::<Utc>::from_timestamp_millis),
            magnitude: props.mag,
            felt: props.felt,
            cdi: props.cdi,
            mmi: props.mmi,
            alert: props.alert.clone(),
            tsunami: props.tsunami.is_some_and(|flag| flag != 0),
            sig: props.sig,
            status: props.status.clone().unwrap_or_default(),
            dmin: props.dmin,
            gap: props.gap,
            mag_type: props.mag_type.clone(),
            event_type: props.event_type.clone().unwrap_or_default(),
            url: props.url.clone(),
            longitude,
            latitude,
            depth: geometry.depth(),
        })
    }

    /// Latitude clamped to what the map can draw.
    #[must_use]
    pub fn plot_latitude(&self) -> f64 {
        self.latitude.clamp(-MAX_PLOT_LATITUDE, MAX_PLOT_LATITUDE)
    }

    #[must_use]
    pub fn marker_style(&self) -> MarkerStyle {
        MarkerStyle::for_magnitude(self.magnitude)
    }

    /// Origin time in the local zone, ISO-8601 with milliseconds.
    #[must_use]
    pub fn local_time(&self) -> Option<String> {
        self.time.map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%dT%H:%M:%S%.3f")
                .to_string()
        })
    }

    /// Label used in lists: the feed title, or magnitude and place when the
    /// feed had no title.
    #[must_use]
    pub fn display_title(&self) -> String {
        if !self.title.is_empty() {
            return self.title.clone();
        }
        match self.magnitude {
            Some(mag) => format!("M {mag:.1} - {}", self.place),
            None => self.place.clone(),
        }
    }
}
