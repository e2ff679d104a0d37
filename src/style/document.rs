//! Vector style documents: ordered layers plus their tile source.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::style::expr::Expr;

const MAPBOX_SCHEME: &str = "mapbox://";

/// Style layer `type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// Full-tile color.
    Background,
    /// Polygons.
    Fill,
    /// Polylines.
    Line,
    /// Icons and text at point features.
    Symbol,
    /// Layer types the tile renderer does not draw (`raster`, `hillshade`, ...).
    Other(String),
}

impl From<&str> for LayerKind {
    fn from(s: &str) -> Self {
        match s {
            "background" => Self::Background,
            "fill" => Self::Fill,
            "line" => Self::Line,
            "symbol" => Self::Symbol,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A paint or layout block: every entry parsed once as an expression, with the
/// raw JSON kept for list-valued properties read verbatim (`text-font`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    exprs: BTreeMap<String, Expr>,
    raw: serde_json::Map<String, serde_json::Value>,
}

impl Properties {
    /// Parse every entry of a paint or layout object.
    pub fn from_json(raw: serde_json::Map<String, serde_json::Value>) -> Self {
        let exprs = raw
            .iter()
            .map(|(k, v)| (k.clone(), Expr::parse(v)))
            .collect();
        Self { exprs, raw }
    }

    /// Parsed expression for `name`.
    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.exprs.get(name)
    }

    /// JSON of `name` as written.
    pub fn raw(&self, name: &str) -> Option<&serde_json::Value> {
        self.raw.get(name)
    }

    /// Whether `name` is set.
    pub fn contains(&self, name: &str) -> bool {
        self.exprs.contains_key(name)
    }

    /// True when no property is set.
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}

#[derive(Deserialize)]
struct RawLayer {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "source-layer", default)]
    source_layer: Option<String>,
    #[serde(default)]
    minzoom: Option<f64>,
    #[serde(default)]
    filter: Option<serde_json::Value>,
    #[serde(default)]
    paint: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    layout: serde_json::Map<String, serde_json::Value>,
}

/// One entry of the style's `layers` list.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "RawLayer")]
pub struct StyleLayer {
    /// Layer id, also used as the output group id.
    pub id: String,
    /// Layer `type`.
    pub kind: LayerKind,
    /// Tile layer the features come from.
    pub source_layer: Option<String>,
    /// Layer is hidden below this zoom.
    pub min_zoom: Option<f64>,
    /// Features are drawn when this is truthy.
    pub filter: Option<Expr>,
    /// Paint properties.
    pub paint: Properties,
    /// Layout properties.
    pub layout: Properties,
}

impl From<RawLayer> for StyleLayer {
    fn from(raw: RawLayer) -> Self {
        Self {
            id: raw.id,
            kind: LayerKind::from(raw.kind.as_str()),
            source_layer: raw.source_layer,
            min_zoom: raw.minzoom,
            filter: raw.filter.as_ref().map(Expr::parse),
            paint: Properties::from_json(raw.paint),
            layout: Properties::from_json(raw.layout),
        }
    }
}

impl StyleLayer {
    /// Whether the layer is hidden below its min-zoom at `zoom`.
    pub fn below_min_zoom(&self, zoom: u8) -> bool {
        self.min_zoom.is_some_and(|z| z > f64::from(zoom))
    }
}

/// Entry of the style's `sources` map.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StyleSource {
    /// Source `type`, such as `vector`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tileset URL.
    #[serde(default)]
    pub url: Option<String>,
}

/// A parsed vector style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StyleDocument {
    /// Style name.
    #[serde(default)]
    pub name: Option<String>,
    /// Layers in draw order.
    pub layers: Vec<StyleLayer>,
    /// Data sources by name.
    #[serde(default)]
    pub sources: HashMap<String, StyleSource>,
}

impl StyleDocument {
    /// Parse a style document from JSON text.
    pub fn from_json(json: &str) -> RouteMapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a style document from a JSON value.
    pub fn from_value(value: serde_json::Value) -> RouteMapResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Layer with `id`.
    pub fn layer(&self, id: &str) -> Option<&StyleLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Tileset id of the `composite` vector source.
    pub fn vector_source(&self) -> RouteMapResult<&str> {
        let source = self
            .sources
            .get("composite")
            .ok_or_else(|| RouteMapError::validation("style has no composite source"))?;
        if source.kind != "vector" {
            return Err(RouteMapError::validation(format!(
                "composite source is {}, not vector",
                source.kind
            )));
        }
        source
            .url
            .as_deref()
            .and_then(|url| url.strip_prefix(MAPBOX_SCHEME))
            .ok_or_else(|| {
                RouteMapError::validation(format!(
                    "composite source url {:?} is not a {MAPBOX_SCHEME} url",
                    source.url
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/document.rs"]
mod tests;
