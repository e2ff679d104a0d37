//! Decoded vector-tile data.
//!
//! Tiles arrive already decoded (protobuf decoding belongs to whoever fetches
//! them), as a map of source-layer name to features whose coordinates are in
//! the tile's local extent.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::foundation::error::RouteMapResult;
use crate::style::value::Value;

/// Tile-local coordinate pair.
pub type TilePoint = [f64; 2];

/// Feature geometry in GeoJSON shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Single point.
    Point(TilePoint),
    /// Several points.
    MultiPoint(Vec<TilePoint>),
    /// Polyline.
    LineString(Vec<TilePoint>),
    /// Several polylines.
    MultiLineString(Vec<Vec<TilePoint>>),
    /// Polygon rings.
    Polygon(Vec<Vec<TilePoint>>),
    /// Several polygons.
    MultiPolygon(Vec<Vec<Vec<TilePoint>>>),
}

impl Geometry {
    /// GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::MultiPoint(_) => "MultiPoint",
            Self::LineString(_) => "LineString",
            Self::MultiLineString(_) => "MultiLineString",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Type name with any `Multi` prefix removed.
    pub fn base_type(&self) -> &'static str {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => "Point",
            Self::LineString(_) | Self::MultiLineString(_) => "LineString",
            Self::Polygon(_) | Self::MultiPolygon(_) => "Polygon",
        }
    }
}

/// One tile feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Shape in tile-local coordinates.
    pub geometry: Geometry,
    /// Feature attributes read by `get` and `has`.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    /// Feature without properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: serde_json::Map::new(),
        }
    }

    /// Add or replace a property.
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Property `key` as an expression value.
    pub fn property(&self, key: &str) -> Option<Value> {
        self.properties.get(key).map(Value::from_json)
    }
}

fn default_extent() -> u32 {
    4096
}

/// Features of one source layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Coordinate extent of the layer, 4096 unless stated.
    #[serde(default = "default_extent")]
    pub extent: u32,
    /// Features in draw order.
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl TileLayer {
    /// Layer at the default extent.
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            extent: default_extent(),
            features,
        }
    }
}

/// One decoded tile: source-layer name to layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorTile {
    /// Layers by source-layer name.
    pub layers: HashMap<String, TileLayer>,
}

impl VectorTile {
    /// Parse a decoded tile from JSON text.
    pub fn from_json(json: &str) -> RouteMapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add or replace a layer.
    pub fn with_layer(mut self, name: impl Into<String>, layer: TileLayer) -> Self {
        self.layers.insert(name.into(), layer);
        self
    }

    /// Layer `name`.
    pub fn layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.get(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tile/model.rs"]
mod tests;
