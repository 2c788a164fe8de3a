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

//! World map of the current events.
//!
//! The map keeps its own copy of the events together with the URL they came
//! from, so it can tell when the data file on disk has moved on.

pub mod carto;
pub mod markers;

use std::path::PathBuf;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use eframe::egui;
use log::{debug, warn};
use quake_feed::QuakeEvent;
use walkers::{HttpOptions, HttpTiles, Map, MapMemory};

pub use carto::CartoTileSource;
pub use markers::{MarkerSpot, QuakeMarkersPlugin};

use crate::config::MapTheme;

pub struct QuakeMap {
    tiles: Option<HttpTiles>,
    theme: MapTheme,
    cache_dir: PathBuf,
    memory: MapMemory,
    events: Vec<QuakeEvent>,
    local_url: Option<String>,
}

impl QuakeMap {
    pub fn new(theme: MapTheme, cache_dir: PathBuf, zoom: f64) -> Self {
        let mut memory = MapMemory::default();
        if let Err(e) = memory.set_zoom(zoom) {
            warn!("Ignoring map zoom {zoom}: {e:?}");
        }
        Self {
            tiles: None,
            theme,
            cache_dir,
            memory,
            events: Vec::new(),
            local_url: None,
        }
    }

    pub fn events(&self) -> &[QuakeEvent] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<&QuakeEvent> {
        self.events.get(index)
    }

    pub fn local_url(&self) -> Option<&str> {
        self.local_url.as_deref()
    }

    /// True when the session holds data this map has not plotted yet.
    pub fn is_stale(&self, current_url: Option<&str>) -> bool {
        current_url.is_some() && self.local_url.as_deref() != current_url
    }

    /// Replace the plotted events with those loaded from `url`.
    pub fn set_events(&mut self, url: &str, events: Vec<QuakeEvent>) {
        debug!("Map now shows {} events from {url}", events.len());
        self.events = events;
        self.local_url = Some(url.to_string());
    }

    pub fn set_theme(&mut self, theme: MapTheme) {
        if theme != self.theme {
            self.theme = theme;
            self.tiles = None;
        }
    }

    /// Pan the map so `event` is in the middle.
    pub fn center_on(&mut self, event: &QuakeEvent) {
        self.memory
            .center_at(walkers::lat_lon(event.plot_latitude(), event.longitude));
    }

    fn tile_cache(&self) -> PathBuf {
        self.cache_dir.join(self.theme.style().replace('/', "-"))
    }

    /// Draw the map filling the remaining space. Returns the index of a
    /// clicked event when `picking` is on.
    pub fn show(&mut self, ui: &mut egui::Ui, picking: bool) -> Option<usize> {
        let markers: Vec<MarkerSpot> = self
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| MarkerSpot::for_event(index, event))
            .collect();
        let clicked_idx = Arc::new(AtomicI32::new(-1));

        let plugin = QuakeMarkersPlugin {
            markers,
            clicked_idx: clicked_idx.clone(),
            picking,
        };

        let theme = self.theme;
        let cache = self.tile_cache();
        let tiles = self.tiles.get_or_insert_with(|| {
            let options = HttpOptions {
                cache: Some(cache),
                ..Default::default()
            };
            HttpTiles::with_options(CartoTileSource::new(theme), options, ui.ctx().clone())
        });
        let map = Map::new(Some(tiles), &mut self.memory, walkers::lat_lon(0.0, 0.0))
            .with_plugin(plugin);
        ui.add(map);

        let idx = clicked_idx.load(Ordering::Relaxed);
        usize::try_from(idx).ok().filter(|&i| i < self.events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_until_events_set() {
        let mut map = QuakeMap::new(MapTheme::Light, PathBuf::from("/tmp/tiles"), 2.0);
        assert!(!map.is_stale(None));
        assert!(map.is_stale(Some("https://a")));

        map.set_events("https://a", Vec::new());
        assert!(!map.is_stale(Some("https://a")));
        assert!(map.is_stale(Some("https://b")));
        assert_eq!(map.local_url(), Some("https://a"));
    }

    #[test]
    fn test_theme_change_drops_tiles() {
        let mut map = QuakeMap::new(MapTheme::Light, PathBuf::from("/tmp/tiles"), 2.0);
        map.set_theme(MapTheme::Dark);
        assert_eq!(map.theme, MapTheme::Dark);
        assert!(map.tiles.is_none());
    }
}
