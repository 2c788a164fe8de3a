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

//! Application configuration management.
//!
//! Persistent settings are stored in TOML through `confy`. Every field has a
//! serde default so that older files keep loading as new settings are added.

use std::path::PathBuf;

use quake_feed::FeedPeriod;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "quakemap-desktop";
const CONFIG_NAME: &str = "config";

/// Basemap style served by the Carto CDN
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapTheme {
    #[default]
    Light,
    Dark,
    Voyager,
}

impl MapTheme {
    pub const ALL: [MapTheme; 3] = [MapTheme::Light, MapTheme::Dark, MapTheme::Voyager];

    /// Path segment of the tile URL
    pub fn style(self) -> &'static str {
        match self {
            MapTheme::Light => "light_all",
            MapTheme::Dark => "dark_all",
            MapTheme::Voyager => "rastertiles/voyager",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapTheme::Light => "Light",
            MapTheme::Dark => "Dark",
            MapTheme::Voyager => "Voyager",
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Period used by the preset feeds in the Refresh menu
    #[serde(default)]
    pub feed_period: FeedPeriod,

    /// Zoom level the map opens at
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    #[serde(default)]
    pub map_theme: MapTheme,

    /// Fetch encyclopedia summaries and photos on the detail page
    #[serde(default = "default_true")]
    pub wiki_lookups: bool,

    /// Show the magnitude legend on the map
    #[serde(default = "default_true")]
    pub show_legend: bool,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where session files are written (defaults to the user cache dir)
    #[serde(default)]
    pub session_dir: Option<PathBuf>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_zoom() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("{APP_NAME}/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            feed_period: FeedPeriod::default(),
            default_zoom: default_zoom(),
            map_theme: MapTheme::default(),
            wiki_lookups: true,
            show_legend: true,
            request_timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            session_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, writing defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, CONFIG_NAME, self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Session directory: the configured one, or a per-process directory
    /// under the user cache dir so two instances never share data files.
    pub fn resolve_session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join(APP_NAME)
                .join(format!("session-{}", std::process::id()))
        })
    }

    /// Root of the walkers tile cache; each theme gets a subdirectory
    pub fn tile_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(APP_NAME)
            .join("tiles")
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_file_uses_defaults() {
        let config: AppConfig = toml_from("feed_period = \"Week\"\nwiki_lookups = false\n");
        assert_eq!(config.feed_period, FeedPeriod::Week);
        assert!(!config.wiki_lookups);
        assert!(config.show_legend);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.map_theme, MapTheme::Light);
    }

    #[test]
    fn test_round_trip_through_confy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.map_theme = MapTheme::Dark;
        config.session_dir = Some(tmp.path().join("session"));
        confy::store_path(&path, &config).unwrap();

        let loaded: AppConfig = confy::load_path(&path).unwrap();
        assert_eq!(loaded.map_theme, MapTheme::Dark);
        assert_eq!(loaded.resolve_session_dir(), tmp.path().join("session"));
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(1));
    }

    fn toml_from(text: &str) -> AppConfig {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, text).unwrap();
        confy::load_path(&path).unwrap()
    }
}
