// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Initial map view and base tile layer settings.

/// Center of metropolitan France.
pub const FRANCE_CENTER: LatLng = LatLng {
    lat: 46.227638,
    lon: 2.213749,
};

/// Zoom level that shows all of metropolitan France.
pub const DEFAULT_ZOOM: u8 = 6;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

/// Templated base tile layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayerConfig {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
}

impl TileLayerConfig {
    pub fn openstreetmap() -> Self {
        Self {
            url_template: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }

    /// Expand the template for one tile.
    pub fn tile_url(&self, subdomain: char, z: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{s}", subdomain.encode_utf8(&mut [0; 4]))
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Map view applied once when the map instance is created.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewState {
    pub center: LatLng,
    pub zoom: u8,
    pub tiles: TileLayerConfig,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self {
            center: FRANCE_CENTER,
            zoom: DEFAULT_ZOOM,
            tiles: TileLayerConfig::openstreetmap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_france() {
        let view = MapViewState::default();
        assert_eq!(view.center.lat, 46.227638);
        assert_eq!(view.center.lon, 2.213749);
        assert_eq!(view.zoom, 6);
        assert_eq!(view.tiles.attribution, "© OpenStreetMap contributors");
    }

    #[test]
    fn test_tile_url_expansion() {
        let tiles = TileLayerConfig::openstreetmap();
        assert_eq!(
            tiles.tile_url('b', 6, 32, 22),
            "https://b.tile.openstreetmap.org/6/32/22.png"
        );
    }
}
