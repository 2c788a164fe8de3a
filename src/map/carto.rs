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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

use crate::config::MapTheme;

/// Carto CDN basemap in one of its raster styles
pub struct CartoTileSource {
    theme: MapTheme,
}

impl CartoTileSource {
    pub fn new(theme: MapTheme) -> Self {
        Self { theme }
    }
}

impl TileSource for CartoTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Spread requests over the a-d subdomains
        let subdomain = ['a', 'b', 'c', 'd'][((tile_id.x + tile_id.y) % 4) as usize];

        format!(
            "https://{}.basemaps.cartocdn.com/{}/{}/{}/{}.png",
            subdomain,
            self.theme.style(),
            tile_id.zoom,
            tile_id.x,
            tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors, © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_uses_theme_style() {
        let tile = TileId { x: 1, y: 2, zoom: 3 };
        assert_eq!(
            CartoTileSource::new(MapTheme::Light).tile_url(tile),
            "https://d.basemaps.cartocdn.com/light_all/3/1/2.png"
        );
        assert_eq!(
            CartoTileSource::new(MapTheme::Voyager).tile_url(tile),
            "https://d.basemaps.cartocdn.com/rastertiles/voyager/3/1/2.png"
        );
    }
}
