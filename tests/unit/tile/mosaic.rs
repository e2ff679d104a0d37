use super::*;
use crate::tile::model::{Feature, Geometry, TileLayer};
use crate::tile::sprite::{MemorySpriteSource, SpriteSource};
use serde_json::json;

const PIN: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4"/></svg>"##;

fn frame(left: f64, top: f64, right: f64, bottom: f64) -> MapFrame {
    MapFrame::from_edges(left, top, right, bottom).unwrap()
}

fn style() -> StyleDocument {
    StyleDocument::from_value(json!({"layers": [
        {"id": "land", "type": "background", "paint": {"background-color": "#eeeeee"}},
        {"id": "stops", "type": "symbol", "source-layer": "poi", "layout": {"icon-image": "pin"}}
    ]}))
    .unwrap()
}

fn pin_tile() -> VectorTile {
    VectorTile::default().with_layer(
        "poi",
        TileLayer::new(vec![Feature::new(Geometry::Point([2048.0, 2048.0]))]),
    )
}

fn source_for(range: &TileRange) -> MemoryTileSource {
    range
        .iter()
        .fold(MemoryTileSource::new(), |src, c| src.with_tile(c, pin_tile()))
}

fn sprites() -> (Arc<MemorySpriteSource>, SpriteCache) {
    let source = Arc::new(MemorySpriteSource::new().with_sprite("pin", PIN));
    let cache = SpriteCache::new(Arc::clone(&source) as Arc<dyn SpriteSource>);
    (source, cache)
}

#[test]
fn zoom_tracks_frame_size() {
    assert_eq!(select_zoom(&frame(0.0, 0.0, 3000.0, 100.0)), 12);
    assert_eq!(select_zoom(&frame(0.0, 0.0, 300.0, 100.0)), 13);
    assert_eq!(select_zoom(&frame(0.0, 0.0, 10.0, 10.0)), 14);
}

#[test]
fn range_is_row_major() {
    let range = TileRange::covering(&frame(100.0, 100.0, 700.0, 700.0), 12);
    assert_eq!(range.len(), 4);
    let coords: Vec<_> = range.iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(
        coords,
        [(3490, 1584), (3491, 1584), (3490, 1585), (3491, 1585)]
    );
}

#[test]
fn basemap_places_tiles_in_row_major_order() {
    let f = frame(100.0, 100.0, 700.0, 700.0);
    let range = TileRange::covering(&f, select_zoom(&f));
    let tiles = source_for(&range);
    let (source, cache) = sprites();

    let svg = render_basemap(
        &f,
        &style(),
        &tiles,
        &cache,
        &BasemapOpts::default().with_threads(4),
    )
    .unwrap();

    assert!(svg.starts_with("<g id=\"background-map\">\n"));
    let order: Vec<usize> = ["tile3490-1584-z12", "tile3491-1584-z12", "tile3490-1585-z12", "tile3491-1585-z12"]
        .iter()
        .map(|id| svg.find(id).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(svg.matches("scale(0.125, 0.125) \">").count(), 4);
    assert_eq!(source.load_count(), 1);
}

#[test]
fn missing_tile_fails_basemap() {
    let f = frame(100.0, 100.0, 700.0, 700.0);
    let (_, cache) = sprites();
    let err = render_basemap(
        &f,
        &style(),
        &MemoryTileSource::new(),
        &cache,
        &BasemapOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RouteMapError::Validation(_)));
}

#[test]
fn zero_threads_is_rejected() {
    let f = frame(100.0, 100.0, 700.0, 700.0);
    let (_, cache) = sprites();
    let range = TileRange::covering(&f, 12);
    let err = render_basemap(
        &f,
        &style(),
        &source_for(&range),
        &cache,
        &BasemapOpts::default().with_threads(0),
    )
    .unwrap_err();
    assert!(err.to_string().contains("threads"));
}
