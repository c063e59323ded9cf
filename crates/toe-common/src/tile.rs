//! Slippy-map tile addressing and Web-Mercator pixel math.

use serde::{Deserialize, Serialize};

/// Tile raster edge length in pixels.
pub const TILE_SIZE: u32 = 256;

/// Ground resolution in meters per pixel at the equator, zoom 0
/// (Earth circumference / 256).
pub const EQUATOR_METERS_PER_PIXEL: f64 = 156543.03392804097;

/// A tile coordinate (z/x/y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x)
    pub x: u32,
    /// Row (y)
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Generate a cache key string.
    pub fn cache_key(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// World-pixel coordinate of this tile's top-left corner.
    pub fn pixel_origin(&self) -> (f64, f64) {
        (
            self.x as f64 * TILE_SIZE as f64,
            self.y as f64 * TILE_SIZE as f64,
        )
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Number of pixels along one world axis at a zoom level (256 * 2^z).
pub fn world_pixel_extent(zoom: u32) -> f64 {
    TILE_SIZE as f64 * 2f64.powi(zoom as i32)
}

/// Project lon/lat (degrees) to global Web-Mercator pixel coordinates at
/// the given zoom.
///
/// X maps longitude linearly; Y uses the spherical Mercator form
/// `0.5 - ln((1+sin lat)/(1-sin lat)) / (4 pi)`. Latitudes at exactly
/// +/-90 project to an infinite Y and fall outside every tile.
pub fn latlon_to_world_pixel(lat: f64, lon: f64, zoom: u32) -> (f64, f64) {
    let world = world_pixel_extent(zoom);
    let x = (lon + 180.0) / 360.0 * world;

    let sin_lat = lat.to_radians().sin();
    let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * std::f64::consts::PI)) * world;

    (x, y)
}

/// Ground resolution in meters per pixel at a latitude and zoom.
pub fn meters_per_pixel(lat: f64, zoom: u32) -> f64 {
    EQUATOR_METERS_PER_PIXEL * lat.to_radians().cos() / 2f64.powi(zoom as i32)
}

/// Convert lat/lon to the Web-Mercator tile containing it.
pub fn latlon_to_tile(lat: f64, lon: f64, zoom: u32) -> TileCoord {
    let (px, py) = latlon_to_world_pixel(lat, lon, zoom);
    let n = 2f64.powi(zoom as i32);
    let max_index = n - 1.0;

    let x = (px / TILE_SIZE as f64).floor().clamp(0.0, max_index) as u32;
    let y = (py / TILE_SIZE as f64).floor().clamp(0.0, max_index) as u32;

    TileCoord { z: zoom, x, y }
}
