//! Spherical-Mercator projection into the schematic's planar unit system.
//!
//! Projected coordinates are measured in basemap pixels at [`PROJECTION_ZOOM`],
//! relative to the north-west corner of [`ORIGIN_TILE`]. One tile at that zoom
//! spans [`TILE_SPAN`] units, so schematic and basemap layers share a single
//! coordinate space without re-projection.

use std::f64::consts::PI;

use crate::foundation::core::{GeoPosition, Point};

/// Zoom level the planar unit system is anchored to.
pub const PROJECTION_ZOOM: u8 = 12;

/// Reference tile `(x, y)` at [`PROJECTION_ZOOM`] mapped to the origin.
///
/// Chosen so the Seoul/Gyeonggi/Busan service region lands on positive,
/// moderate-magnitude coordinates.
pub const ORIGIN_TILE: (u32, u32) = (3490, 1584);

/// Planar units per tile at [`PROJECTION_ZOOM`].
pub const TILE_SPAN: f64 = 512.0;

/// Slippy-map tile address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column, growing eastwards.
    pub x: u32,
    /// Row, growing southwards.
    pub y: u32,
    /// Zoom level.
    pub zoom: u8,
}

impl TileCoord {
    /// Tile `x`/`y` at `zoom`.
    pub fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }
}

fn tiles_at(zoom: u8) -> f64 {
    2f64.powi(i32::from(zoom))
}

/// Fractional Mercator tile position of `pos` at `zoom`.
fn mercator(pos: GeoPosition, zoom: u8) -> (f64, f64) {
    let n = tiles_at(zoom);
    let lat_rad = pos.lat.to_radians();
    let x = (pos.lon + 180.0) / 360.0 * n;
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n;
    (x, y)
}

fn inverse_mercator(x: f64, y: f64, zoom: u8) -> GeoPosition {
    let n = tiles_at(zoom);
    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    GeoPosition { lon, lat }
}

/// Project a geographic position into planar units.
pub fn project(pos: GeoPosition) -> Point {
    let (x, y) = mercator(pos, PROJECTION_ZOOM);
    Point::new(
        (x - f64::from(ORIGIN_TILE.0)) * TILE_SPAN,
        (y - f64::from(ORIGIN_TILE.1)) * TILE_SPAN,
    )
}

/// Inverse of [`project`].
pub fn unproject(p: Point) -> GeoPosition {
    inverse_mercator(
        p.x / TILE_SPAN + f64::from(ORIGIN_TILE.0),
        p.y / TILE_SPAN + f64::from(ORIGIN_TILE.1),
        PROJECTION_ZOOM,
    )
}

/// Tile containing `pos` at `zoom`.
pub fn tile_for(pos: GeoPosition, zoom: u8) -> TileCoord {
    let (x, y) = mercator(pos, zoom);
    TileCoord {
        x: x.floor().max(0.0) as u32,
        y: y.floor().max(0.0) as u32,
        zoom,
    }
}

/// North-west corner of `tile`.
pub fn tile_origin(tile: TileCoord) -> GeoPosition {
    inverse_mercator(f64::from(tile.x), f64::from(tile.y), tile.zoom)
}

/// Planar span of one tile at `zoom`.
pub fn tile_span_at(zoom: u8) -> f64 {
    TILE_SPAN * 2f64.powi(i32::from(PROJECTION_ZOOM) - i32::from(zoom))
}

#[cfg(test)]
#[path = "../../tests/unit/geo/projection.rs"]
mod tests;
