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

//! Query construction for the USGS FDSN event service.
//!
//! [`QueryForm`] keeps every settings field as the raw text the user typed,
//! so that blank or malformed entries are rejected here rather than being
//! silently coerced by the UI. [`SummaryFeed`] covers the preset feeds that
//! need no form at all.

mod timezone;

pub use timezone::{TimeZone, TIME_ZONES};

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base of every custom query; parameters are appended with `&`.
pub const QUERY_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson";

/// Base of the preset summary feeds.
pub const SUMMARY_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// Largest result limit the service accepts.
pub const MAX_LIMIT: u32 = 20_000;

pub const MIN_DEPTH_KM: f64 = -100.0;
pub const MAX_DEPTH_KM: f64 = 1000.0;

/// Rejections produced by [`QueryForm::build_url`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Sorry, the times entered are incorrect")]
    BadTime,

    #[error("Sorry, the dates entered are incorrect")]
    BadDate,

    #[error("Please check that you've entered the min/max latitudes\nand longitudes correctly for the rectangle search")]
    BadRectangle,

    #[error("Please check that you've entered the lat/long/maxradius correctly for the circle search")]
    BadCircle,

    #[error("Please check that the search limit you've entered is valid")]
    BadLimit,

    #[error("Please check that you've entered the min/max depth fields correctly")]
    BadDepth,

    #[error("Please check that you've entered the min/max magnitude\nfields correctly")]
    BadMagnitude,
}

impl QueryError {
    /// Short rejection code, stable across releases.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::BadTime => "Bad Time",
            QueryError::BadDate => "Bad Date",
            QueryError::BadRectangle => "Bad Rectangle Options",
            QueryError::BadCircle => "Bad Circle Options",
            QueryError::BadLimit => "Bad Limit",
            QueryError::BadDepth => "Bad Min/Max Depths",
            QueryError::BadMagnitude => "Bad Min/Max Magnitudes",
        }
    }

    /// Title for the dialog that reports this rejection.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            QueryError::BadTime => "Time Error",
            QueryError::BadDate => "Date Error",
            QueryError::BadRectangle => "Rectangle Search Error",
            QueryError::BadCircle => "Circle Search Error",
            QueryError::BadLimit => "Search Limit Error",
            QueryError::BadDepth => "Depth Error",
            QueryError::BadMagnitude => "Magnitude Error",
        }
    }
}

/// Spatial filter applied to a custom query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchArea {
    #[default]
    Rectangle,
    Circle,
}

impl SearchArea {
    pub const ALL: [SearchArea; 2] = [SearchArea::Rectangle, SearchArea::Circle];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SearchArea::Rectangle => "Rectangle",
            SearchArea::Circle => "Circle",
        }
    }
}

/// Raw contents of the settings form.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryForm {
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
    pub timezone: TimeZone,
    pub area: SearchArea,

    pub min_latitude: String,
    pub max_latitude: String,
    pub min_longitude: String,
    pub max_longitude: String,

    pub latitude: String,
    pub longitude: String,
    pub max_radius: String,

    pub min_depth: String,
    pub max_depth: String,
    pub min_magnitude: String,
    pub max_magnitude: String,
    pub limit: String,
}

impl Default for QueryForm {
    fn default() -> Self {
        Self::at(Local::now().naive_local())
    }
}

impl QueryForm {
    /// Form prefilled for `now`: both ends of the time window at `now`
    /// rounded down to five minutes, the whole globe, shallow-to-deep
    /// depths, magnitudes 1 to 2 and a single result.
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        let minute = now.minute() - now.minute() % 5;
        let rounded = now
            .time()
            .with_minute(minute)
            .and_then(|t| t.with_second(0))
            .unwrap_or_else(|| now.time());
        let date = now.date().format("%Y-%m-%d").to_string();
        let time = rounded.format("%H:%M:%S").to_string();

        Self {
            start_date: date.clone(),
            end_date: date,
            start_time: time.clone(),
            end_time: time,
            timezone: TimeZone::UTC,
            area: SearchArea::Rectangle,
            min_latitude: "-90".to_string(),
            max_latitude: "90".to_string(),
            min_longitude: "-180".to_string(),
            max_longitude: "180".to_string(),
            latitude: "90".to_string(),
            longitude: "180".to_string(),
            max_radius: "180".to_string(),
            min_depth: "-100".to_string(),
            max_depth: "1000".to_string(),
            min_magnitude: "1".to_string(),
            max_magnitude: "2".to_string(),
            limit: "1".to_string(),
        }
    }

    /// Validate every field and build the query URL.
    ///
    /// Checks run in a fixed order (times, dates, search area, limit, depth,
    /// magnitude) and the first failure is returned.
    pub fn build_url(&self) -> Result<String, QueryError> {
        let mut url = String::from(QUERY_BASE_URL);

        let start_time = self.start_time.trim();
        let end_time = self.end_time.trim();
        if !is_time(start_time) || !is_time(end_time) {
            return Err(QueryError::BadTime);
        }

        let start_date = self.start_date.trim();
        let end_date = self.end_date.trim();
        if !is_date(start_date) || !is_date(end_date) {
            return Err(QueryError::BadDate);
        }

        let offset = self.timezone.url_offset();
        url.push_str(&format!(
            "&starttime={start_date}T{start_time}{offset}&endtime={end_date}T{end_time}{offset}"
        ));

        match self.area {
            SearchArea::Rectangle => url.push_str(&self.rectangle_params()?),
            SearchArea::Circle => url.push_str(&self.circle_params()?),
        }

        let limit = self.limit.trim();
        if !limit
            .parse::<u32>()
            .is_ok_and(|n| (1..=MAX_LIMIT).contains(&n))
        {
            return Err(QueryError::BadLimit);
        }

        let min_depth = self.min_depth.trim();
        let max_depth = self.max_depth.trim();
        match (
            bounded(min_depth, MIN_DEPTH_KM, MAX_DEPTH_KM),
            bounded(max_depth, MIN_DEPTH_KM, MAX_DEPTH_KM),
        ) {
            (Some(lo), Some(hi)) if lo < hi => {}
            _ => return Err(QueryError::BadDepth),
        }

        let min_mag = self.min_magnitude.trim();
        let max_mag = self.max_magnitude.trim();
        match (
            bounded(min_mag, 0.0, f64::MAX),
            bounded(max_mag, 0.0, f64::MAX),
        ) {
            (Some(lo), Some(hi)) if lo < hi => {}
            _ => return Err(QueryError::BadMagnitude),
        }

        url.push_str(&format!(
            "&mindepth={min_depth}&maxdepth={max_depth}&minmagnitude={min_mag}&maxmagnitude={max_mag}&limit={limit}"
        ));

        Ok(url)
    }

    fn rectangle_params(&self) -> Result<String, QueryError> {
        let min_lat = self.min_latitude.trim();
        let max_lat = self.max_latitude.trim();
        let min_lon = self.min_longitude.trim();
        let max_lon = self.max_longitude.trim();

        let ordered = |lo: Option<f64>, hi: Option<f64>| matches!((lo, hi), (Some(lo), Some(hi)) if lo < hi);
        let lat_ok = ordered(bounded(min_lat, -90.0, 90.0), bounded(max_lat, -90.0, 90.0));
        let lon_ok = ordered(bounded(min_lon, -180.0, 180.0), bounded(max_lon, -180.0, 180.0));
        if !(lat_ok && lon_ok) {
            return Err(QueryError::BadRectangle);
        }

        Ok(format!(
            "&minlatitude={min_lat}&maxlatitude={max_lat}&minlongitude={min_lon}&maxlongitude={max_lon}"
        ))
    }

    fn circle_params(&self) -> Result<String, QueryError> {
        let lat = self.latitude.trim();
        let lon = self.longitude.trim();
        let radius = self.max_radius.trim();

        if bounded(lat, -90.0, 90.0).is_none()
            || bounded(lon, -180.0, 180.0).is_none()
            || bounded(radius, 0.0, 180.0).is_none()
        {
            return Err(QueryError::BadCircle);
        }

        Ok(format!("&latitude={lat}&longitude={lon}&maxradius={radius}"))
    }
}

/// `HH:MM:SS` with every field zero-padded. Leap seconds are rejected.
fn is_time(text: &str) -> bool {
    has_shape(text, "99:99:99")
        && NaiveTime::parse_from_str(text, "%H:%M:%S")
            .is_ok_and(|time| time.nanosecond() < 1_000_000_000)
}

/// `YYYY-MM-DD` with every field zero-padded.
fn is_date(text: &str) -> bool {
    has_shape(text, "9999-99-99") && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// True when `text` matches `pattern` byte for byte, with `9` standing for
/// any ASCII digit.
fn has_shape(text: &str, pattern: &str) -> bool {
    text.len() == pattern.len()
        && text.bytes().zip(pattern.bytes()).all(|(c, p)| match p {
            b'9' => c.is_ascii_digit(),
            _ => c == p,
        })
}

/// Parse `text` as a finite number inside `[min, max]`.
fn bounded(text: &str, min: f64, max: f64) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (min..=max).contains(v))
}

/// Preset summary feeds published by USGS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryFeed {
    Significant,
    M4_5,
    M2_5,
    M1_0,
}

impl SummaryFeed {
    pub const ALL: [SummaryFeed; 4] = [
        SummaryFeed::Significant,
        SummaryFeed::M4_5,
        SummaryFeed::M2_5,
        SummaryFeed::M1_0,
    ];

    /// Feed name as it appears in the URL
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryFeed::Significant => "significant",
            SummaryFeed::M4_5 => "4.5",
            SummaryFeed::M2_5 => "2.5",
            SummaryFeed::M1_0 => "1.0",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SummaryFeed::Significant => "Significant Earthquakes",
            SummaryFeed::M4_5 => "4.5+ Earthquakes",
            SummaryFeed::M2_5 => "2.5+ Earthquakes",
            SummaryFeed::M1_0 => "1.0+ Earthquakes",
        }
    }

    #[must_use]
    pub fn url(&self, period: FeedPeriod) -> String {
        format!("{SUMMARY_BASE_URL}/{}_{}.geojson", self.as_str(), period.as_str())
    }
}

/// Time window covered by a summary feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedPeriod {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl FeedPeriod {
    pub const ALL: [FeedPeriod; 4] = [
        FeedPeriod::Hour,
        FeedPeriod::Day,
        FeedPeriod::Week,
        FeedPeriod::Month,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedPeriod::Hour => "hour",
            FeedPeriod::Day => "day",
            FeedPeriod::Week => "week",
            FeedPeriod::Month => "month",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            FeedPeriod::Hour => "Hour",
            FeedPeriod::Day => "Day",
            FeedPeriod::Week => "Week",
            FeedPeriod::Month => "Month",
        }
    }
}

impl fmt::Display for FeedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
