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

//! GeoJSON schema of the USGS event feeds.
//!
//! Field names follow the upstream documentation so that the records shown
//! to the user mirror the service exactly. Anything the service may send as
//! `null` is optional here.

use serde::{Deserialize, Serialize};

/// Top-level GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub metadata: FeedMetadata,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMetadata {
    pub count: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Generation time in epoch milliseconds
    #[serde(default)]
    pub generated: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

/// `Point` geometry: `[longitude, latitude, depth_km]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Geometry {
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied()
    }

    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied()
    }

    #[must_use]
    pub fn depth(&self) -> Option<f64> {
        self.coordinates.get(2).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Properties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    /// Origin time in epoch milliseconds
    pub time: Option<i64>,
    pub updated: Option<i64>,
    pub tz: Option<i32>,
    pub url: Option<String>,
    pub detail: Option<String>,
    pub felt: Option<u64>,
    pub cdi: Option<f64>,
    pub mmi: Option<f64>,
    pub alert: Option<String>,
    pub status: Option<String>,
    pub tsunami: Option<u8>,
    pub sig: Option<i64>,
    pub net: Option<String>,
    pub code: Option<String>,
    pub ids: Option<String>,
    pub sources: Option<String>,
    pub types: Option<String>,
    pub nst: Option<u32>,
    pub dmin: Option<f64>,
    pub rms: Option<f64>,
    pub gap: Option<f64>,
    #[serde(rename = "magType")]
    pub mag_type: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub title: Option<String>,
}

impl FeatureCollection {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::KOBUK_FEED;

    #[test]
    fn test_decode_query_response() {
        let collection = FeatureCollection::from_slice(KOBUK_FEED.as_bytes()).unwrap();
        assert_eq!(collection.metadata.count, 1);
        assert_eq!(collection.metadata.api.as_deref(), Some("1.8.1"));
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(feature.id, "ak0195sm9zcz");
        assert_eq!(feature.geometry.longitude(), Some(-157.2));
        assert_eq!(feature.geometry.latitude(), Some(66.2404));
        assert_eq!(feature.geometry.depth(), Some(0.1));

        let props = &feature.properties;
        assert_eq!(props.mag, Some(1.7));
        assert_eq!(props.mag_type.as_deref(), Some("ml"));
        assert_eq!(props.event_type.as_deref(), Some("earthquake"));
        assert_eq!(props.felt, None);
        assert_eq!(props.sig, Some(44));
    }

    #[test]
    fn test_missing_metadata_is_an_error() {
        assert!(FeatureCollection::from_slice(br#"{"features":[]}"#).is_err());
    }

    #[test]
    fn test_sparse_properties() {
        let json = br#"{"metadata":{"count":1},"features":[
            {"properties":{"mag":null,"place":null},"geometry":{"coordinates":[1.0,2.0]}}
        ]}"#;
        let collection = FeatureCollection::from_slice(json).unwrap();
        let feature = &collection.features[0];
        assert_eq!(feature.id, "");
        assert_eq!(feature.properties, Properties::default());
        assert_eq!(feature.geometry.depth(), None);
    }
}
