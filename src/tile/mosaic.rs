//! Basemap mosaic: every tile covering a map frame, rendered and placed in
//! the schematic's planar coordinate space.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use rayon::prelude::*;

use crate::foundation::core::{MapFrame, Point};
use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::projection::{
    PROJECTION_ZOOM, TileCoord, project, tile_for, tile_origin, tile_span_at, unproject,
};
use crate::style::document::StyleDocument;
use crate::tile::model::VectorTile;
use crate::tile::render::{TileRenderOpts, render_tile};
use crate::tile::sprite::SpriteCache;

/// Most detailed basemap zoom requested.
pub const MAX_BASEMAP_ZOOM: u8 = 14;

/// Supplies decoded tiles by address.
pub trait TileSource: Send + Sync {
    /// Decoded tile at `coord`.
    fn tile(&self, coord: TileCoord) -> RouteMapResult<Arc<VectorTile>>;
}

/// Tiles held in memory.
#[derive(Debug, Default)]
pub struct MemoryTileSource {
    tiles: HashMap<TileCoord, Arc<VectorTile>>,
}

impl MemoryTileSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the decoded tile at `coord`.
    pub fn with_tile(mut self, coord: TileCoord, tile: VectorTile) -> Self {
        self.tiles.insert(coord, Arc::new(tile));
        self
    }
}

impl TileSource for MemoryTileSource {
    fn tile(&self, coord: TileCoord) -> RouteMapResult<Arc<VectorTile>> {
        self.tiles.get(&coord).cloned().ok_or_else(|| {
            RouteMapError::validation(format!(
                "no tile at {}/{}/{}",
                coord.zoom, coord.x, coord.y
            ))
        })
    }
}

/// Inclusive block of tiles at one zoom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRange {
    /// Zoom of every tile in the range.
    pub zoom: u8,
    /// North-west tile `(x, y)`.
    pub min: (u32, u32),
    /// South-east tile `(x, y)`, inclusive.
    pub max: (u32, u32),
}

impl TileRange {
    /// Tiles touched by `frame` at `zoom`.
    pub fn covering(frame: &MapFrame, zoom: u8) -> Self {
        let a = tile_for(unproject(Point::new(frame.left(), frame.top())), zoom);
        let b = tile_for(unproject(Point::new(frame.right(), frame.bottom())), zoom);
        Self {
            zoom,
            min: (a.x.min(b.x), a.y.min(b.y)),
            max: (a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Row-major: north to south, west to east within a row.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min.1..=self.max.1)
            .flat_map(move |y| (self.min.0..=self.max.0).map(move |x| TileCoord::new(x, y, self.zoom)))
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        let w = self.max.0.saturating_sub(self.min.0) as usize + 1;
        let h = self.max.1.saturating_sub(self.min.1) as usize + 1;
        w * h
    }

    /// A range always holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Coarsest zoom from [`PROJECTION_ZOOM`] up to [`MAX_BASEMAP_ZOOM`] whose
/// tiles are no larger than the frame's longer side.
pub fn select_zoom(frame: &MapFrame) -> u8 {
    let longest = frame.width().max(frame.height());
    let mut zoom = PROJECTION_ZOOM;
    while tile_span_at(zoom) > longest && zoom < MAX_BASEMAP_ZOOM {
        zoom += 1;
    }
    zoom
}

/// Knobs for [`render_basemap`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasemapOpts {
    /// Worker threads for tile rendering; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Options for each tile render.
    pub tile: TileRenderOpts,
}

impl BasemapOpts {
    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the per-tile options.
    pub fn with_tile(mut self, tile: TileRenderOpts) -> Self {
        self.tile = tile;
        self
    }
}

fn build_thread_pool(threads: Option<usize>) -> RouteMapResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(RouteMapError::validation(
            "basemap 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| RouteMapError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

/// Render the basemap under `frame` as one `background-map` group.
///
/// Tiles render in parallel; the output lists them in row-major order and any
/// tile failure fails the whole basemap.
#[tracing::instrument(skip_all)]
pub fn render_basemap(
    frame: &MapFrame,
    style: &StyleDocument,
    tiles: &dyn TileSource,
    sprites: &SpriteCache,
    opts: &BasemapOpts,
) -> RouteMapResult<String> {
    let zoom = select_zoom(frame);
    let range = TileRange::covering(frame, zoom);
    let coords: Vec<TileCoord> = range.iter().collect();
    tracing::debug!(zoom, tiles = coords.len(), "rendering basemap");

    let tile_opts = TileRenderOpts {
        full_document: false,
        ..opts.tile.clone()
    };
    let pool = build_thread_pool(opts.threads)?;
    let fragments = pool.install(|| {
        coords
            .par_iter()
            .map(|&coord| {
                let tile = tiles.tile(coord)?;
                render_tile(style, &tile, coord, sprites, &tile_opts)
            })
            .collect::<RouteMapResult<Vec<String>>>()
    })?;

    let span = tile_span_at(zoom);
    let scale = span / f64::from(tile_opts.extent);
    let origin = project(tile_origin(TileCoord::new(range.min.0, range.min.1, zoom)));

    let mut out = String::from("<g id=\"background-map\">\n");
    for (coord, fragment) in coords.iter().zip(&fragments) {
        let x = origin.x + f64::from(coord.x - range.min.0) * span;
        let y = origin.y + f64::from(coord.y - range.min.1) * span;
        let _ = writeln!(
            out,
            "<g id=\"tile{}-{}-z{}\" transform=\"translate({x}, {y}) scale({scale}, {scale}) \">",
            coord.x, coord.y, zoom
        );
        out.push_str(fragment);
        out.push_str("</g>\n");
    }
    out.push_str("</g>\n");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/tile/mosaic.rs"]
mod tests;
