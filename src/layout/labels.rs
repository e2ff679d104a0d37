//! Greedy stop-label placement.
//!
//! Labels are placed one at a time; each picks the side of its stop that
//! overlaps the fewest earlier labels and route vertices. Placement order
//! therefore decides the result and callers must keep it stable.

use crate::foundation::core::{MapFrame, Point, Rect, Vec2};
use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::geometry::{expand_window, nearest_point, overlap_area};
use crate::layout::text::{FontFace, TextMetrics};
use crate::route::names::split_pass_suffix;

/// Label text size in label-local units.
pub const LABEL_FONT_PX: f64 = 30.0;
/// Pass-through suffix size in label-local units.
pub const LABEL_SUFFIX_PX: f64 = 24.0;
/// Horizontal padding around label text, label-local units.
pub const LABEL_PADDING: f64 = 30.0;
/// Label-local units to map units, before `label_scale`.
pub const LABEL_UNIT_SCALE: f64 = 0.56;
/// Room reserved beside the origin stop's label for the depot icon.
pub const ORIGIN_ICON_PX: f64 = 40.0;

/// Half the side of the box guarding each route vertex.
const VERTEX_GUARD: f64 = 2.0;
/// Weight of route-vertex overlap against label overlap.
const VERTEX_WEIGHT: f64 = 4.0;

/// Side of the stop marker a label sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDirection {
    /// Above the marker.
    Up,
    /// Below the marker.
    Down,
    /// Left of the marker.
    Left,
    /// Right of the marker.
    Right,
}

impl LabelDirection {
    /// Candidates in priority order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction from its numeric code (0 up, 1 down, 2 left, 3 right).
    pub fn from_index(index: i64) -> RouteMapResult<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| {
                RouteMapError::validation(format!("label direction {index} is not in 0..=3"))
            })
    }

    /// Numeric code, the inverse of [`LabelDirection::from_index`].
    pub fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Down => 1,
            Self::Left => 2,
            Self::Right => 3,
        }
    }
}

/// Measured stop label, in label-local units.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelText<'a> {
    /// Stop name without the pass-through marker.
    pub main: &'a str,
    /// Pass-through marker, drawn smaller.
    pub suffix: &'a str,
    /// Width of the label box including padding.
    pub width: f64,
}

impl<'a> LabelText<'a> {
    /// Split `name` and measure both parts with `metrics`.
    pub fn measure(name: &'a str, metrics: &dyn TextMetrics) -> Self {
        let (main, suffix) = split_pass_suffix(name);
        let width = metrics.width(main, FontFace::StopLabel) * LABEL_FONT_PX
            + metrics.width(suffix, FontFace::StopLabel) * LABEL_SUFFIX_PX
            + LABEL_PADDING;
        Self {
            main,
            suffix,
            width,
        }
    }
}

/// Route direction around `index`, estimated over a window of `threshold` map units.
pub fn path_direction(points: &[Point], index: usize, threshold: f64) -> Vec2 {
    let (prev, next) = expand_window(points, index, index, threshold);
    match (points.get(prev), points.get(next)) {
        (Some(a), Some(b)) => *b - *a,
        _ => Vec2::ZERO,
    }
}

/// Unit normal of `dir`, flipped so its x component is non-negative.
///
/// A zero direction yields the diagonal `(1, 1)` normalized.
pub fn label_normal(dir: Vec2) -> Vec2 {
    let mut n = Vec2::new(dir.y, -dir.x);
    if n.x == 0.0 && n.y == 0.0 {
        n = Vec2::new(1.0, 1.0);
    }
    if n.x < 0.0 {
        n = -n;
    }
    n / n.hypot()
}

/// Candidate label boxes around a stop marker, in [`LabelDirection::ALL`] order.
///
/// `width` is the label-local width; `scale` is the label scale factor. The
/// left and right boxes are pushed off the route along `normal`; an origin
/// label is widened by the depot icon.
pub fn candidate_rects(anchor: Point, normal: Vec2, width: f64, scale: f64, origin: bool) -> [Rect; 4] {
    let tsf = LABEL_UNIT_SCALE * scale;
    let h = LABEL_FONT_PX * tsf;
    let w = width * tsf;
    let icon = if origin { ORIGIN_ICON_PX * tsf } else { 0.0 };

    let up = Point::new(anchor.x - w / 2.0, anchor.y - 25.0 * scale - h / 2.0);
    let down = Point::new(anchor.x - w / 2.0, anchor.y + 25.0 * scale - h / 2.0);
    let left = Point::new(
        anchor.x - 16.0 * normal.x * scale - w - icon,
        anchor.y - 16.0 * normal.y * scale - h / 2.0,
    );
    let right = Point::new(
        anchor.x + 16.0 * normal.x * scale,
        anchor.y + 16.0 * normal.y * scale - h / 2.0,
    );

    [
        Rect::from_origin_size(up, (w, h)),
        Rect::from_origin_size(down, (w, h)),
        Rect::from_origin_size(left, (w + icon, h)),
        Rect::from_origin_size(right, (w + icon, h)),
    ]
}

/// Collision score of `candidate` against placed labels and route vertices.
pub fn collision_score(candidate: Rect, placed: &[Rect], path: &[Point]) -> f64 {
    let labels: f64 = placed.iter().map(|r| overlap_area(*r, candidate)).sum();
    let vertices: f64 = path
        .iter()
        .map(|p| {
            let guard = Rect::new(
                p.x - VERTEX_GUARD,
                p.y - VERTEX_GUARD,
                p.x + VERTEX_GUARD,
                p.y + VERTEX_GUARD,
            );
            overlap_area(guard, candidate)
        })
        .sum();
    labels + VERTEX_WEIGHT * vertices
}

/// Label boxes placed so far in one render pass.
#[derive(Clone, Debug, Default)]
pub struct LabelBoard {
    placed: Vec<Rect>,
}

impl LabelBoard {
    /// Empty board for a new render pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxes committed so far, in placement order.
    pub fn placed(&self) -> &[Rect] {
        &self.placed
    }

    /// Lowest-scoring candidate; ties keep the earlier candidate.
    ///
    /// The origin stop only considers left and right.
    pub fn choose(&self, candidates: &[Rect; 4], path: &[Point], origin: bool) -> LabelDirection {
        let allowed: &[LabelDirection] = if origin {
            &[LabelDirection::Left, LabelDirection::Right]
        } else {
            &LabelDirection::ALL
        };

        let mut best = allowed[0];
        let mut best_score = f64::INFINITY;
        for &dir in allowed {
            let score = collision_score(candidates[dir.index()], &self.placed, path);
            if score < best_score {
                best = dir;
                best_score = score;
            }
        }
        best
    }

    /// Record a chosen box and grow `frame` around it.
    pub fn commit(&mut self, rect: Rect, frame: &mut MapFrame) {
        self.placed.push(rect);
        frame.include_rect(rect);
    }
}

/// One stop label to place.
#[derive(Clone, Copy, Debug)]
pub struct LabelRequest {
    /// Projected stop position.
    pub anchor: Point,
    /// Index of the nearest route point on the stop's own leg.
    pub path_index: usize,
    /// Label-local width from [`LabelText::measure`].
    pub width: f64,
    /// First stop of the route; restricted to left/right.
    pub origin: bool,
    /// Explicit side, bypassing scoring.
    pub forced: Option<LabelDirection>,
}

/// Where a label ended up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Chosen side.
    pub direction: LabelDirection,
    /// Label box in map units.
    pub rect: Rect,
    /// Local route direction, used to orient the depot icon.
    pub path_dir: Vec2,
}

/// Place one label against `board`, growing `frame`.
pub fn place_label(
    req: &LabelRequest,
    points: &[Point],
    scale: f64,
    board: &mut LabelBoard,
    frame: &mut MapFrame,
) -> Placement {
    let path_dir = path_direction(points, req.path_index, 10.0 * scale);
    let normal = label_normal(path_dir);
    let candidates = candidate_rects(req.anchor, normal, req.width, scale, req.origin);

    let direction = match req.forced {
        Some(dir) => dir,
        None => board.choose(&candidates, points, req.origin),
    };
    tracing::debug!(?direction, forced = req.forced.is_some(), "placed label");

    let rect = candidates[direction.index()];
    board.commit(rect, frame);
    Placement {
        direction,
        rect,
        path_dir,
    }
}

/// Nearest route point to `pos` on its own leg.
///
/// Outbound stops search `points[..turnback]`, inbound stops
/// `points[turnback..]`. An empty outbound prefix searches the first point.
pub fn leg_point(pos: Point, points: &[Point], turnback: usize, inbound: bool) -> RouteMapResult<usize> {
    if inbound {
        let start = turnback.min(points.len());
        Ok(nearest_point(pos, &points[start..])? + start)
    } else {
        let end = turnback.max(1).min(points.len());
        nearest_point(pos, &points[..end])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/labels.rs"]
mod tests;
