//! Routemap renders transit routes as schematic SVG maps.
//!
//! A route's stops and path geometry are projected into a planar unit system
//! shared with vector-tile basemaps, so the schematic and its basemap compose
//! into one document without re-projection.
//!
//! # Pipeline overview
//!
//! 1. **Project**: `GeoPosition -> Point` at a fixed reference zoom ([`project`]).
//! 2. **Classify**: pick which stops get labels and on which leg they sit ([`classify_stops`]).
//! 3. **Place**: greedy, order-dependent label placement against placed labels and the path
//!    ([`place_label`]), plus shared outbound/inbound runs ([`shared_runs`]).
//! 4. **Render**: one [`RouteMap::render`] pass produces the schematic fragment and its frame.
//! 5. **Basemap** (optional): evaluate a vector style against decoded tiles ([`render_tile`],
//!    [`render_basemap`]) and wrap everything with [`compose_document`].
//!
//! Every render pass owns its frame and label accumulator; style evaluation takes its zoom
//! context per call, so independent renders can run concurrently.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geo;
mod layout;
mod render;
mod route;
mod style;
mod tile;

pub use foundation::core::{GeoPosition, MapFrame, Point, Rect, Size, Vec2};
pub use foundation::error::{RouteMapError, RouteMapResult};
pub use geo::geometry::{
    distance, distance_from_segment, expand_window, min_distance_to_points,
    min_distance_to_polyline, nearest_point, overlap_area,
};
pub use geo::projection::{
    ORIGIN_TILE, PROJECTION_ZOOM, TILE_SPAN, TileCoord, project, tile_for, tile_origin,
    tile_span_at, unproject,
};
pub use layout::labels::{
    LABEL_FONT_PX, LABEL_PADDING, LABEL_SUFFIX_PX, LABEL_UNIT_SCALE, LabelBoard, LabelDirection,
    LabelRequest, LabelText, ORIGIN_ICON_PX, Placement, candidate_rects, collision_score,
    label_normal, leg_point, path_direction, place_label,
};
pub use layout::text::{FallbackMetrics, FontFace, FontMetrics, TextMetrics};
pub use render::document::compose_document;
pub use render::opts::{RenderOpts, Theme, suggest_one_way};
pub use render::schematic::{RenderPass, RouteMap, SchematicOutput, depot_angle};
pub use render::svg::{InlineStyle, escape_text, path_data, path_element};
pub use route::classify::{ClassifyOpts, Section, StopAnnotation, Turnback, classify_stops};
pub use route::legs::{PathRun, RouteLegs, shared_runs};
pub use route::model::{BusStop, Region, RouteInfo, RoutePalette, route_region, route_type_label};
pub use route::names::{
    RouteRunKind, StopName, canonical_stop_name, is_pass_stop, route_name_runs,
    split_pass_suffix, split_route_name,
};
pub use style::color::{Rgb, parse_color};
pub use style::document::{LayerKind, Properties, StyleDocument, StyleLayer, StyleSource};
pub use style::eval::{EvalCtx, evaluate, evaluate_color, evaluate_number};
pub use style::expr::{ArithOp, CompareOp, Expr};
pub use style::value::Value;
pub use tile::model::{Feature, Geometry, TileLayer, TilePoint, VectorTile};
pub use tile::mosaic::{
    BasemapOpts, MAX_BASEMAP_ZOOM, MemoryTileSource, TileRange, TileSource, render_basemap,
    select_zoom,
};
pub use tile::render::{TileRenderOpts, render_tile};
pub use tile::sprite::{DirSpriteSource, MemorySpriteSource, Sprite, SpriteCache, SpriteSource};
