//! Schematic route rendering: path, stop markers, labels and the info badge.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::foundation::core::{GeoPosition, MapFrame, Point, Rect, Vec2};
use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::projection::project;
use crate::layout::labels::{
    LABEL_UNIT_SCALE, LabelBoard, LabelDirection, LabelRequest, LabelText, ORIGIN_ICON_PX,
    Placement, leg_point, place_label,
};
use crate::layout::text::{FontFace, TextMetrics};
use crate::render::opts::RenderOpts;
use crate::render::svg::{InlineStyle, escape_text, path_element};
use crate::route::classify::{ClassifyOpts, Section, StopAnnotation, Turnback, classify_stops};
use crate::route::legs::{RouteLegs, shared_runs};
use crate::route::model::{BusStop, RouteInfo, RoutePalette};
use crate::route::names::{RouteRunKind, route_name_runs, split_route_name};

const NIGHT_STOP_FILL: &str = "#ffcc00";
const PASS_FILL: &str = "#cccccc";
const LABEL_TEXT_STYLE: &str = "font-size:30px;line-height:1.0;font-family:'KoPubDotum Bold';text-align:start;letter-spacing:0px;word-spacing:0px;fill-opacity:1;";

const DEPOT_ICON: &str = concat!(
    r##"<g id="bus_depot" transform="translate(18, 18) scale(2.8, 2.8) rotate({deg})">"##,
    r##"<circle style="fill:{color};fill-opacity:1;stroke:none" cx="0" cy="0" r="5.8" /> "##,
    r##"<path style="fill:#ffffff;fill-opacity:1;stroke:none" d="m 0,0 c -0.19263,0 -0.3856,0.073 -0.5332,0.2207 -0.2952,0.2952 -0.2952,0.7712 0,1.0664 l 1.00976,1.0097 h -4.10742 c -0.41747,0 -0.75195,0.3365 -0.75195,0.7539 0,0.4175 0.33448,0.7539 0.75195,0.7539 h 4.11719 l -1.05469,1.0547 c -0.2952,0.2952 -0.2952,0.7712 0,1.0664 0.2952,0.2952 0.77121,0.2952 1.06641,0 l 2.25586,-2.2539 c 0.0305,-0.022 0.0603,-0.049 0.0879,-0.076 0.16605,-0.1661 0.23755,-0.3876 0.21679,-0.6036 -6.2e-4,-0.01 -10e-4,-0.013 -0.002,-0.019 -0.002,-0.018 -0.005,-0.035 -0.008,-0.053 -3.9e-4,0 -0.002,0 -0.002,-0.01 -0.0347,-0.1908 -0.14003,-0.3555 -0.28907,-0.4668 l -2.22461,-2.2265 c -0.1476,-0.1476 -0.34057,-0.2207 -0.5332,-0.2207 z" transform="translate(0.6,-3)" /></g>"##,
);

/// Per-pass mutable state: the growing frame and the placed label boxes.
#[derive(Clone, Debug)]
pub struct RenderPass {
    /// Bounding box of everything drawn so far.
    pub frame: MapFrame,
    /// Label boxes placed so far.
    pub labels: LabelBoard,
}

/// Result of one schematic render.
#[derive(Clone, Debug)]
pub struct SchematicOutput {
    /// SVG fragment in projected map units.
    pub svg: String,
    /// Bounds of everything drawn.
    pub frame: MapFrame,
    /// Stops drawn, in placement order.
    pub stops: Vec<StopAnnotation>,
    /// Label boxes, parallel to `stops`.
    pub label_rects: Vec<Rect>,
    /// Info badge box.
    pub badge: Rect,
}

/// One route prepared for schematic rendering.
#[derive(Clone, Debug)]
pub struct RouteMap {
    route: RouteInfo,
    stops: Vec<BusStop>,
    points: Vec<Point>,
    opts: RenderOpts,
    palette: RoutePalette,
    turnback: Turnback,
    directions: BTreeMap<usize, LabelDirection>,
}

impl RouteMap {
    /// Project `geometry` and locate the turnback.
    pub fn new(
        route: RouteInfo,
        stops: Vec<BusStop>,
        geometry: &[GeoPosition],
        opts: RenderOpts,
    ) -> RouteMapResult<Self> {
        let points = geometry.iter().map(|p| project(*p)).collect();
        Self::from_points(route, stops, points, opts)
    }

    /// Like [`RouteMap::new`] for geometry that is already projected.
    pub fn from_points(
        route: RouteInfo,
        stops: Vec<BusStop>,
        points: Vec<Point>,
        opts: RenderOpts,
    ) -> RouteMapResult<Self> {
        if points.is_empty() {
            return Err(RouteMapError::geometry("route geometry has no points"));
        }
        let turnback = Turnback::locate(&stops, &points, opts.one_way)?;
        let palette = RoutePalette::for_route(&route);
        Ok(Self {
            route,
            stops,
            points,
            opts,
            palette,
            turnback,
            directions: BTreeMap::new(),
        })
    }

    /// Override the turnback stop.
    pub fn with_turnback(mut self, stop: usize) -> RouteMapResult<Self> {
        self.turnback = Turnback::at(stop, &self.stops, &self.points)?;
        Ok(self)
    }

    /// Force the label side of stop `ord` (0 up, 1 down, 2 left, 3 right).
    pub fn with_label_direction(mut self, ord: usize, code: i64) -> RouteMapResult<Self> {
        if ord >= self.stops.len() {
            return Err(RouteMapError::validation(format!(
                "stop {ord} out of range for {} stops",
                self.stops.len()
            )));
        }
        self.directions.insert(ord, LabelDirection::from_index(code)?);
        Ok(self)
    }

    /// Route metadata.
    pub fn route(&self) -> &RouteInfo {
        &self.route
    }

    /// Projected route geometry.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Render options.
    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Line colors derived from the route type.
    pub fn palette(&self) -> RoutePalette {
        self.palette
    }

    /// Current turnback stop and route point.
    pub fn turnback(&self) -> Turnback {
        self.turnback
    }

    /// Start a pass: the frame covers the route geometry, no labels yet.
    pub fn render_init(&self) -> RouteMapResult<RenderPass> {
        Ok(RenderPass {
            frame: MapFrame::from_points(&self.points)?,
            labels: LabelBoard::new(),
        })
    }

    /// Run one complete render pass.
    #[tracing::instrument(skip(self, metrics), fields(route = %self.route.name))]
    pub fn render(&self, metrics: &dyn TextMetrics) -> RouteMapResult<SchematicOutput> {
        let mut pass = self.render_init()?;
        let mut svg = self.render_path()?;

        let mut stops = classify_stops(
            &self.stops,
            &self.points,
            self.turnback,
            ClassifyOpts {
                one_way: self.opts.one_way,
                min_interval: self.opts.min_interval,
            },
        )?;
        for stop in &mut stops {
            stop.direction = self.directions.get(&stop.ord).copied();
        }

        let mut label_rects = Vec::with_capacity(stops.len());
        for stop in &stops {
            svg.push_str(&self.stop_circle(stop, &mut pass.frame));
            let (group, rect) = self.stop_label(stop, &mut pass, metrics)?;
            svg.push_str(&group);
            label_rects.push(rect);
        }

        let (badge_svg, badge) = self.info_badge(&mut pass.frame, metrics);
        svg.push_str(&badge_svg);
        svg.push('\n');

        tracing::debug!(stops = stops.len(), "rendered schematic");
        Ok(SchematicOutput {
            svg,
            frame: pass.frame,
            stops,
            label_rects,
            badge,
        })
    }

    /// Drawn extent of the route, from the first stop to the last.
    pub fn legs(&self) -> RouteMapResult<RouteLegs> {
        let t = self.turnback.point;
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Err(RouteMapError::validation("route has no stops"));
        };
        let start = leg_point(project(first.pos), &self.points, t, false)?;
        let end = leg_point(project(last.pos), &self.points, t, true)?;
        Ok(RouteLegs::new(start, t, end))
    }

    fn effective_section(&self, stop: &StopAnnotation) -> Section {
        if self.opts.one_way {
            Section::Outbound
        } else {
            stop.section
        }
    }

    fn section_color(&self, section: Section) -> &'static str {
        match section {
            Section::Outbound => self.palette.line,
            Section::Inbound => self.palette.dark,
        }
    }

    fn path_style(&self, color: &str, width: f64) -> String {
        InlineStyle::new()
            .with("stroke", color)
            .with("display", "inline")
            .with("fill", "none")
            .with("stroke-width", width)
            .with("stroke-linecap", "round")
            .with("stroke-linejoin", "round")
            .with("stroke-miterlimit", 4)
            .with("stroke-dasharray", "none")
            .with("stroke-opacity", 1)
            .to_string()
    }

    /// Full route path, with shared inbound runs drawn beneath it in the dark color.
    fn render_path(&self) -> RouteMapResult<String> {
        let scale = self.opts.path_scale;
        let legs = self.legs()?;
        let mut svg = String::new();

        if !self.opts.one_way {
            let casing = self.path_style(self.palette.dark, 14.0 * scale);
            for run in shared_runs(&self.points, &legs, 5.0 * scale) {
                svg.push_str(&path_element(&casing, run.slice(&self.points)));
            }
        }

        let line = self.path_style(self.palette.line, 8.0 * scale);
        svg.push_str(&path_element(&line, legs.full().slice(&self.points)));
        Ok(svg)
    }

    fn stop_circle(&self, stop: &StopAnnotation, frame: &mut MapFrame) -> String {
        let scale = self.opts.marker_scale;
        let r = 6.0 * scale;

        let fill = if self.route.is_night() {
            NIGHT_STOP_FILL
        } else if stop.pass {
            PASS_FILL
        } else {
            self.opts.theme.stop_fill()
        };
        let style = InlineStyle::new()
            .with("fill", fill)
            .with("stroke", self.section_color(self.effective_section(stop)))
            .with("opacity", 1)
            .with("fill-opacity", 1)
            .with("stroke-width", 3.2 * scale)
            .with("stroke-dasharray", "none")
            .with("stroke-opacity", 1);

        frame.include_rect(Rect::new(
            stop.pos.x - r,
            stop.pos.y - r,
            stop.pos.x + r,
            stop.pos.y + r,
        ));
        format!(
            "<circle style=\"{style}\" cx=\"{}\" cy=\"{}\" r=\"{r}\" />\n",
            stop.pos.x, stop.pos.y
        )
    }

    fn stop_label(
        &self,
        stop: &StopAnnotation,
        pass: &mut RenderPass,
        metrics: &dyn TextMetrics,
    ) -> RouteMapResult<(String, Rect)> {
        let scale = self.opts.label_scale;
        let section = self.effective_section(stop);
        let text = LabelText::measure(&stop.name, metrics);
        let origin = stop.ord == 0;

        let req = LabelRequest {
            anchor: stop.pos,
            path_index: leg_point(
                stop.pos,
                &self.points,
                self.turnback.point,
                section == Section::Inbound,
            )?,
            width: text.width,
            origin,
            forced: stop.direction,
        };
        let placed = place_label(&req, &self.points, scale, &mut pass.labels, &mut pass.frame);

        let mut body = String::new();
        let mut text_offset = 0.0;
        if origin {
            let (icon_offset, offset) = if placed.direction == LabelDirection::Left {
                (text.width + 4.0, 0.0)
            } else {
                (0.0, ORIGIN_ICON_PX)
            };
            text_offset = offset;
            let icon = DEPOT_ICON
                .replace("{deg}", &format!("{:.2}", depot_angle(placed.path_dir)))
                .replace("{color}", self.palette.line);
            let _ = write!(
                body,
                "<g id=\"bus_depot_icon\" transform=\"translate({icon_offset:.2}, 0)\">{icon}</g>\n"
            );
        }

        let mut name = escape_text(text.main);
        if !text.suffix.is_empty() {
            let _ = write!(
                name,
                "<tspan style=\"font-size:24px\">{}</tspan>",
                escape_text(text.suffix)
            );
        }
        let fill = if stop.pass { PASS_FILL } else { "#ffffff" };
        let _ = write!(
            body,
            "<rect style=\"fill:{};fill-opacity:1;stroke:none;\" width=\"{:.2}\" height=\"36\" x=\"{text_offset:.2}\" y=\"0\" ry=\"18\" />",
            self.section_color(section),
            text.width,
        );
        let _ = write!(
            body,
            "<text style=\"{LABEL_TEXT_STYLE}fill:{fill};\" text-anchor=\"middle\" x=\"{:.2}\" y=\"28\">{name}</text>\n",
            text.width / 2.0 + text_offset,
        );

        Ok((label_group(stop.ord, &placed, scale, &body), placed.rect))
    }

    /// Route number and termini box, placed above the frame.
    fn info_badge(&self, frame: &mut MapFrame, metrics: &dyn TextMetrics) -> (String, Rect) {
        let scale = self.opts.badge_scale;
        let (main, suffix) = split_route_name(&self.route.name);

        let mut x = 0.0;
        let mut name_svg = String::new();
        for (kind, run) in route_name_runs(main) {
            let run_text = escape_text(run);
            match kind {
                RouteRunKind::Hangul => {
                    let _ = write!(
                        name_svg,
                        "<text y=\"75\" x=\"{}\" style=\"font-weight:bold;font-size:72px;font-family:'{}';text-align:start;fill:#ffffff\">{run_text}</text>",
                        x + 20.0,
                        FontFace::BadgeBold.family(),
                    );
                    x += metrics.width(run, FontFace::BadgeBold) * 72.0;
                }
                RouteRunKind::Night | RouteRunKind::Other => {
                    let fill = if kind == RouteRunKind::Night {
                        NIGHT_STOP_FILL
                    } else {
                        "#ffffff"
                    };
                    let _ = write!(
                        name_svg,
                        "<text y=\"82\" x=\"{}\" style=\"font-weight:normal;font-size:85.3333px;font-family:'{}';text-align:start;fill:{fill}\">{run_text}</text>",
                        x + 20.0,
                        FontFace::Numeral.family(),
                    );
                    x += metrics.width(run, FontFace::Numeral) * 85.3333;
                }
            }
        }
        let _ = write!(
            name_svg,
            "<text y=\"82\" x=\"{}\" style=\"font-weight:normal;font-size:72px;font-family:'{}';text-align:start;fill:#ffffff\">{}</text>",
            x + 20.0,
            FontFace::Numeral.family(),
            escape_text(suffix),
        );
        x += metrics.width(suffix, FontFace::Numeral) * 72.0;

        let name_width = x + 40.0;
        let termini_width = (metrics.width(&self.route.start, FontFace::BadgeRegular)
            + metrics.width(&self.route.end, FontFace::BadgeRegular))
            * 64.0
            + 135.0;
        let width = (name_width + termini_width) * scale;

        let left = if frame.width() < width {
            frame.center().x - width / 2.0
        } else {
            frame.left()
        };
        let top = frame.top() - 135.0 * scale;
        let rect = Rect::from_origin_size((left, top), (width, 100.0 * scale));
        frame.include_rect(rect);

        let mut svg = format!(
            "<g id=\"businfo\" transform=\"translate({left}, {top}) scale({scale}, {scale})\" style=\"display:inline\">"
        );
        let _ = write!(
            svg,
            "<rect y=\"0\" x=\"0\" height=\"100\" width=\"{name_width}\" id=\"busname_bg\" style=\"opacity:1;fill:{};fill-opacity:1;stroke:none;\" />",
            self.palette.line
        );
        svg.push_str(&name_svg);
        let _ = write!(
            svg,
            "<rect y=\"0\" x=\"{name_width}\" height=\"100\" width=\"{termini_width}\" id=\"busstartend_bg\" style=\"opacity:1;fill:#ffffff;fill-opacity:1;stroke:none;\" />"
        );
        let _ = write!(
            svg,
            "<text id=\"busstartend\" y=\"70\" x=\"{}\" style=\"font-weight:bold;font-size:64px;font-family:'{}';text-align:start;fill:#000000\">{} <tspan style=\"font-family:'NanumSquareRound'\">↔</tspan> {}</text>",
            name_width + 20.0,
            FontFace::BadgeBold.family(),
            escape_text(&self.route.start),
            escape_text(&self.route.end),
        );
        svg.push_str("</g>");
        (svg, rect)
    }
}

fn label_group(ord: usize, placed: &Placement, scale: f64, body: &str) -> String {
    let tsf = LABEL_UNIT_SCALE * scale;
    format!(
        "<g id=\"stop{ord}\" transform=\"translate({:.2}, {:.2}) scale({tsf}, {tsf})\">{body}</g>",
        placed.rect.x0, placed.rect.y0,
    )
}

/// Clockwise angle of `dir` from the +x axis in degrees, in `[0, 360)`.
pub fn depot_angle(dir: Vec2) -> f64 {
    let len = dir.hypot();
    let cos = if len == 0.0 { 1.0 } else { dir.x / len };
    let deg = cos.clamp(-1.0, 1.0).acos().to_degrees();
    if dir.y < 0.0 { 360.0 - deg } else { deg }
}

#[cfg(test)]
#[path = "../../tests/unit/render/schematic.rs"]
mod tests;
