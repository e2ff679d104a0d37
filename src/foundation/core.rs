use crate::foundation::error::{RouteMapError, RouteMapResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoPosition {
    /// Longitude in degrees, east positive.
    pub lon: f64,
    /// Latitude in degrees, north positive.
    pub lat: f64,
}

impl GeoPosition {
    /// Construct a position from longitude and latitude.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// Accumulated output bounding box of one render pass.
///
/// The frame only ever grows: every mutator unions new content into it, and
/// [`MapFrame::expanded`] ignores negative margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapFrame {
    rect: Rect,
}

impl MapFrame {
    /// Frame tightly bounding `points`.
    pub fn from_points(points: &[Point]) -> RouteMapResult<Self> {
        let (first, rest) = points
            .split_first()
            .ok_or_else(|| RouteMapError::geometry("cannot frame an empty point sequence"))?;
        let rect = rest
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        Ok(Self { rect })
    }

    /// Frame from explicit edges; requires `left <= right` and `top <= bottom`.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> RouteMapResult<Self> {
        if left > right {
            return Err(RouteMapError::validation("MapFrame left must be <= right"));
        }
        if top > bottom {
            return Err(RouteMapError::validation("MapFrame top must be <= bottom"));
        }
        Ok(Self {
            rect: Rect::new(left, top, right, bottom),
        })
    }

    /// Grow to include `p`.
    pub fn include_point(&mut self, p: Point) {
        self.rect = self.rect.union_pt(p);
    }

    /// Grow to include `r`.
    pub fn include_rect(&mut self, r: Rect) {
        self.rect = self.rect.union(r.abs());
    }

    /// Copy grown by `margin` on every side. Negative margins are treated as zero.
    pub fn expanded(self, margin: f64) -> Self {
        Self {
            rect: self.rect.inflate(margin.max(0.0), margin.max(0.0)),
        }
    }

    /// Minimum x.
    pub fn left(&self) -> f64 {
        self.rect.x0
    }

    /// Minimum y.
    pub fn top(&self) -> f64 {
        self.rect.y0
    }

    /// Maximum x.
    pub fn right(&self) -> f64 {
        self.rect.x1
    }

    /// Maximum y.
    pub fn bottom(&self) -> f64 {
        self.rect.y1
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    /// Width and height as a [`Size`].
    pub fn size(&self) -> Size {
        self.rect.size()
    }

    /// Center of the frame.
    pub fn center(&self) -> Point {
        self.rect.center()
    }

    /// Return `true` when `r` lies entirely inside the frame (edges inclusive).
    pub fn contains_rect(&self, r: Rect) -> bool {
        let r = r.abs();
        r.x0 >= self.rect.x0 && r.y0 >= self.rect.y0 && r.x1 <= self.rect.x1 && r.y1 <= self.rect.y1
    }

    /// The frame as a plain rectangle.
    pub fn as_rect(&self) -> Rect {
        self.rect
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
