//! Render one decoded vector tile through a style document.

use std::fmt::Write as _;

use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::projection::TileCoord;
use crate::render::svg::{InlineStyle, escape_text};
use crate::style::document::{LayerKind, Properties, StyleDocument, StyleLayer};
use crate::style::eval::{EvalCtx, evaluate, evaluate_color, evaluate_number};
use crate::style::expr::Expr;
use crate::style::value::Value;
use crate::tile::model::{Feature, Geometry, TileLayer, TilePoint, VectorTile};
use crate::tile::sprite::SpriteCache;

/// Style pixels per tile edge; style widths and sizes are scaled from this to
/// the tile extent.
const STYLE_TILE_PX: f64 = 512.0;
/// Clip and background overdraw past the tile edge, hiding seams between tiles.
const EDGE_BLEED: u32 = 16;
const BACKGROUND_STROKE: u32 = 32;
const DEFAULT_TEXT_PX: f64 = 15.0;

/// Knobs for [`render_tile`].
#[derive(Clone, Debug, PartialEq)]
pub struct TileRenderOpts {
    /// Edge length of the output fragment in tile units.
    pub extent: u32,
    /// Clip the fragment to the tile (plus a small bleed).
    pub clip: bool,
    /// Wrap the fragment in a standalone SVG document.
    pub full_document: bool,
    /// Feature coordinates are y-up and must be flipped.
    pub flip_y: bool,
}

impl Default for TileRenderOpts {
    fn default() -> Self {
        Self {
            extent: 4096,
            clip: true,
            full_document: false,
            flip_y: true,
        }
    }
}

impl TileRenderOpts {
    /// Set [`TileRenderOpts::extent`].
    pub fn with_extent(mut self, extent: u32) -> Self {
        self.extent = extent;
        self
    }

    /// Set [`TileRenderOpts::clip`].
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    /// Set [`TileRenderOpts::full_document`].
    pub fn with_full_document(mut self, full_document: bool) -> Self {
        self.full_document = full_document;
        self
    }

    /// Set [`TileRenderOpts::flip_y`].
    pub fn with_flip_y(mut self, flip_y: bool) -> Self {
        self.flip_y = flip_y;
        self
    }
}

/// Render `tile` at `coord` as an SVG fragment `extent` units square.
///
/// Layers are drawn in style order. Layers below their min-zoom, layers whose
/// source-layer the tile lacks and layer types without a renderer are skipped;
/// any evaluation error inside a drawn layer aborts the tile.
#[tracing::instrument(skip(style, tile, sprites, opts), fields(x = coord.x, y = coord.y, zoom = coord.zoom))]
pub fn render_tile(
    style: &StyleDocument,
    tile: &VectorTile,
    coord: TileCoord,
    sprites: &SpriteCache,
    opts: &TileRenderOpts,
) -> RouteMapResult<String> {
    let mut w = TileWriter {
        out: String::new(),
        ctx: EvalCtx::new(coord),
        sprites,
        opts,
        px: f64::from(opts.extent) / STYLE_TILE_PX,
        y_sign: if opts.flip_y { -1.0 } else { 1.0 },
    };
    let extent = opts.extent;

    if opts.full_document {
        w.out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            w.out,
            "<svg width=\"{extent}\" height=\"{extent}\" viewBox=\"0 0 {extent} {extent}\" xmlns=\"http://www.w3.org/2000/svg\">"
        );
    }

    let mut map_attrs = String::new();
    if opts.flip_y {
        let _ = write!(map_attrs, " transform=\"scale(1, -1) translate(0, -{extent})\"");
    }
    if opts.clip {
        let clip_id = format!("map-clip-{}-{}-z{}", coord.x, coord.y, coord.zoom);
        let clip = extent + EDGE_BLEED;
        let _ = writeln!(
            w.out,
            "<defs><clipPath id=\"{clip_id}\"><rect x=\"0\" y=\"0\" width=\"{clip}\" height=\"{clip}\" /></clipPath></defs>"
        );
        let _ = write!(map_attrs, " clip-path=\"url(#{clip_id})\"");
    }
    let _ = writeln!(w.out, "<g id=\"map\"{map_attrs}>");

    for layer in &style.layers {
        w.layer(layer, tile)?;
    }

    w.out.push_str("</g>\n");
    if opts.full_document {
        w.out.push_str("</svg>\n");
    }
    Ok(w.out)
}

struct TileWriter<'a> {
    out: String,
    ctx: EvalCtx,
    sprites: &'a SpriteCache,
    opts: &'a TileRenderOpts,
    /// Tile units per style pixel.
    px: f64,
    /// Sign of visual "down" along y: `-1` inside the y-flipped map group.
    y_sign: f64,
}

impl TileWriter<'_> {
    fn layer(&mut self, layer: &StyleLayer, tile: &VectorTile) -> RouteMapResult<()> {
        if layer.below_min_zoom(self.ctx.zoom) {
            tracing::debug!(layer = %layer.id, "below min-zoom, skipped");
            return Ok(());
        }

        match &layer.kind {
            LayerKind::Background => self.background(layer),
            LayerKind::Other(kind) => {
                tracing::debug!(layer = %layer.id, kind = %kind, "layer type not drawn");
                Ok(())
            }
            LayerKind::Fill | LayerKind::Line | LayerKind::Symbol => {
                let Some(source) = layer
                    .source_layer
                    .as_deref()
                    .and_then(|name| tile.layer(name))
                else {
                    tracing::debug!(layer = %layer.id, "source-layer missing from tile, skipped");
                    return Ok(());
                };
                self.features(layer, source)
            }
        }
    }

    fn background(&mut self, layer: &StyleLayer) -> RouteMapResult<()> {
        let Some(color) = layer.paint.get("background-color") else {
            return Ok(());
        };
        let fill = evaluate_color(color, None, &self.ctx)?;
        let extent = self.opts.extent;
        let _ = writeln!(
            self.out,
            "<g id=\"{}\"><rect x=\"0\" y=\"0\" width=\"{extent}\" height=\"{extent}\" fill=\"{fill}\" stroke=\"{fill}\" stroke-width=\"{BACKGROUND_STROKE}\" /></g>",
            escape_text(&layer.id)
        );
        Ok(())
    }

    fn features(&mut self, layer: &StyleLayer, source: &TileLayer) -> RouteMapResult<()> {
        let _ = writeln!(self.out, "<g id=\"{}\">", escape_text(&layer.id));
        let scale = f64::from(self.opts.extent) / f64::from(source.extent.max(1));

        for feature in &source.features {
            if let Some(filter) = &layer.filter
                && !evaluate(filter, Some(feature), &self.ctx)?.is_truthy()
            {
                continue;
            }
            tracing::trace!(layer = %layer.id, geometry = feature.geometry.type_name(), "drawing feature");

            match layer.kind {
                LayerKind::Fill => {
                    let style = self.fill_style(&layer.paint, feature)?;
                    self.geometry(&feature.geometry, &style, scale)?;
                }
                LayerKind::Line => {
                    let style = self.line_style(&layer.paint, &layer.layout, feature)?;
                    self.geometry(&feature.geometry, &style, scale)?;
                }
                LayerKind::Symbol => self.symbol(&layer.layout, &layer.paint, feature, scale)?,
                LayerKind::Background | LayerKind::Other(_) => {}
            }
        }

        self.out.push_str("</g>\n");
        Ok(())
    }

    fn fill_style(&self, paint: &Properties, feature: &Feature) -> RouteMapResult<InlineStyle> {
        let f = Some(feature);
        let mut style = InlineStyle::new().with("fill", "#000000").with("opacity", 1);
        if let Some(e) = paint.get("fill-color") {
            style.set("fill", evaluate_color(e, f, &self.ctx)?);
        }
        if let Some(e) = paint.get("fill-opacity").or_else(|| paint.get("opacity")) {
            style.set("opacity", evaluate_number(e, f, &self.ctx)?);
        }
        Ok(style)
    }

    fn line_style(
        &self,
        paint: &Properties,
        layout: &Properties,
        feature: &Feature,
    ) -> RouteMapResult<InlineStyle> {
        let f = Some(feature);
        let mut style = InlineStyle::new()
            .with("fill", "none")
            .with("stroke", "#000000")
            .with("stroke-width", 1)
            .with("stroke-opacity", 1);

        if let Some(e) = paint.get("line-color") {
            style.set("stroke", evaluate_color(e, f, &self.ctx)?);
        }
        if let Some(e) = paint.get("line-width") {
            style.set("stroke-width", evaluate_number(e, f, &self.ctx)? * self.px);
        }
        if let Some(e) = paint.get("line-opacity") {
            style.set("stroke-opacity", evaluate_number(e, f, &self.ctx)?);
        }
        if let Some(e) = paint.get("line-dasharray") {
            let Value::Array(dashes) = evaluate(e, f, &self.ctx)? else {
                return Err(RouteMapError::evaluation("line-dasharray must be an array"));
            };
            let mut dash = String::new();
            for d in &dashes {
                let _ = write!(dash, "{d} ");
            }
            style.set("stroke-dasharray", dash);
        }
        if let Some(e) = layout.get("line-cap") {
            style.set("stroke-linecap", evaluate(e, f, &self.ctx)?);
        }
        if let Some(e) = layout.get("line-join") {
            style.set("stroke-linejoin", evaluate(e, f, &self.ctx)?);
        }
        Ok(style)
    }

    fn geometry(
        &mut self,
        geometry: &Geometry,
        style: &InlineStyle,
        scale: f64,
    ) -> RouteMapResult<()> {
        match geometry {
            Geometry::Polygon(rings) => self.polygon(rings, style, scale),
            Geometry::MultiPolygon(polygons) => {
                self.out.push_str("<g>\n");
                for rings in polygons {
                    self.polygon(rings, style, scale)?;
                }
                self.out.push_str("</g>\n");
                Ok(())
            }
            Geometry::LineString(line) => self.shape("polyline", line, style, scale),
            Geometry::MultiLineString(lines) => {
                self.out.push_str("<g>\n");
                for line in lines {
                    self.shape("polyline", line, style, scale)?;
                }
                self.out.push_str("</g>\n");
                Ok(())
            }
            Geometry::Point(_) | Geometry::MultiPoint(_) => Ok(()),
        }
    }

    fn polygon(
        &mut self,
        rings: &[Vec<TilePoint>],
        style: &InlineStyle,
        scale: f64,
    ) -> RouteMapResult<()> {
        for ring in rings {
            self.shape("polygon", ring, style, scale)?;
        }
        Ok(())
    }

    fn shape(
        &mut self,
        tag: &str,
        points: &[TilePoint],
        style: &InlineStyle,
        scale: f64,
    ) -> RouteMapResult<()> {
        if points.is_empty() {
            return Err(RouteMapError::geometry(format!("{tag} with no points")));
        }
        let _ = write!(self.out, "<{tag} points=\"");
        for [x, y] in points {
            let _ = write!(self.out, "{},{} ", x * scale, y * scale);
        }
        let _ = writeln!(self.out, "\" style=\"{style}\" />");
        Ok(())
    }

    fn symbol(
        &mut self,
        layout: &Properties,
        paint: &Properties,
        feature: &Feature,
        scale: f64,
    ) -> RouteMapResult<()> {
        let anchors: Vec<TilePoint> = match &feature.geometry {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(ps) => ps.clone(),
            _ => return Ok(()),
        };

        for [x, y] in anchors {
            let anchor = [x * scale, y * scale];
            if let Some(icon) = layout.get("icon-image") {
                self.icon(icon, layout, feature, anchor)?;
            }
            if let Some(field) = layout.get("text-field") {
                self.text(field, layout, paint, feature, anchor)?;
            }
        }
        Ok(())
    }

    fn icon(
        &mut self,
        icon: &Expr,
        layout: &Properties,
        feature: &Feature,
        [x, y]: TilePoint,
    ) -> RouteMapResult<()> {
        let f = Some(feature);
        let id = evaluate(icon, f, &self.ctx)?;
        if !id.is_truthy() {
            return Ok(());
        }
        let sprite = self.sprites.get(&id.to_string())?;

        let mut size = match layout.get("icon-size") {
            Some(e) => evaluate_number(e, f, &self.ctx)?,
            None => 1.0,
        };
        size *= self.px;

        let left = x - sprite.width / 2.0 * size;
        let top = y - self.y_sign * sprite.height / 2.0 * size;
        let _ = writeln!(
            self.out,
            "<g transform=\"translate({left}, {top}) scale({size}, {})\">{}</g>",
            size * self.y_sign,
            sprite.body
        );
        Ok(())
    }

    fn text(
        &mut self,
        field: &Expr,
        layout: &Properties,
        paint: &Properties,
        feature: &Feature,
        [x, y]: TilePoint,
    ) -> RouteMapResult<()> {
        let f = Some(feature);
        let text = escape_text(&evaluate(field, f, &self.ctx)?.to_string());

        let mut font_px = DEFAULT_TEXT_PX;
        let mut style = InlineStyle::new()
            .with("fill", "#111111")
            .with("stroke", "none")
            .with("text-anchor", "middle")
            .with("font-size", font_px)
            .with("text-align", "center");

        if let Some(family) = layout
            .raw("text-font")
            .and_then(|v| v.as_array())
            .and_then(|fonts| fonts.first())
            .and_then(|font| font.as_str())
        {
            style.set("font-family", family);
        }
        if let Some(e) = layout.get("text-size") {
            font_px = evaluate_number(e, f, &self.ctx)? * self.px;
            style.set("font-size", font_px).set("stroke-width", font_px / 4.0);
        }
        if let Some(e) = paint.get("text-color") {
            style.set("fill", evaluate_color(e, f, &self.ctx)?);
        }
        let mut halo = false;
        if let Some(e) = paint.get("text-halo-color") {
            style.set("stroke", evaluate_color(e, f, &self.ctx)?);
            halo = true;
        }

        let (mut tx, mut ty) = (x, y);
        if let Some(e) = layout.get("text-offset") {
            let offset = evaluate(e, f, &self.ctx)?;
            let (dx, dy) = match &offset {
                Value::Array(xy) => match (
                    xy.first().and_then(Value::as_number),
                    xy.get(1).and_then(Value::as_number),
                ) {
                    (Some(dx), Some(dy)) => (dx, dy),
                    _ => {
                        return Err(RouteMapError::evaluation(
                            "text-offset must hold two numbers",
                        ));
                    }
                },
                other => {
                    return Err(RouteMapError::evaluation(format!(
                        "text-offset must be an array, got {}",
                        other.type_name()
                    )));
                }
            };
            tx += dx * font_px;
            ty += self.y_sign * dy * font_px;
        }

        let flip = if self.opts.flip_y { " scale(1, -1)" } else { "" };
        if halo {
            let _ = writeln!(
                self.out,
                "<text x=\"0\" y=\"0\" transform=\"translate({tx}, {ty}){flip}\" style=\"{style}\">{text}</text>"
            );
        }
        style.set("stroke", "none");
        let _ = writeln!(
            self.out,
            "<text x=\"0\" y=\"0\" transform=\"translate({tx}, {ty}){flip}\" style=\"{style}\">{text}</text>"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tile/render.rs"]
mod tests;
