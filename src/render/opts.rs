use crate::foundation::core::{MapFrame, Point};
use crate::geo::geometry::distance;

/// Reference canvas width the scale factors are relative to.
const REFERENCE_WIDTH: f64 = 640.0;
/// Most extreme aspect ratio the scale derivation considers.
const MAX_ASPECT: f64 = 1.5;
/// End-to-end gap beyond which a route is probably not a loop.
const ONE_WAY_GAP: f64 = 50.0;

/// Color theme of the rendered map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// White page, light stop markers.
    #[default]
    Light,
    /// Dark grey page.
    Dark,
}

impl Theme {
    /// Document background color.
    pub fn page_color(self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#282828",
        }
    }

    /// Fill of an ordinary stop marker.
    pub fn stop_fill(self) -> &'static str {
        self.page_color()
    }
}

/// Knobs for one schematic render.
///
/// Scale factors multiply the nominal sizes of the route line, stop markers,
/// stop labels and the info badge; `min_interval` is the spacing below which
/// ordinary stops are left unlabeled. All lengths are projected map units.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOpts {
    /// Page and stop marker colors.
    pub theme: Theme,
    /// Draw as a one-way route: no casing, last stop is a terminus.
    pub one_way: bool,
    /// Route line width factor.
    pub path_scale: f64,
    /// Stop marker size factor.
    pub marker_scale: f64,
    /// Stop label size factor.
    pub label_scale: f64,
    /// Info badge size factor.
    pub badge_scale: f64,
    /// Minimum spacing between labeled ordinary stops.
    pub min_interval: f64,
    /// Border added around the frame by the document composer.
    pub margin: f64,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            one_way: false,
            path_scale: 1.0,
            marker_scale: 1.0,
            label_scale: 1.0,
            badge_scale: 0.75,
            min_interval: 60.0,
            margin: 30.0,
        }
    }
}

impl RenderOpts {
    /// Scale everything to the extent of `frame`.
    ///
    /// The extent is padded to at most 1.5:1 before measuring so very thin
    /// routes still get readable labels.
    pub fn for_frame(frame: &MapFrame, theme: Theme, one_way: bool) -> Self {
        // Padding the height never changes the width.
        let width = frame.width().max(frame.height() / MAX_ASPECT);
        let size = width / REFERENCE_WIDTH;
        Self {
            theme,
            one_way,
            path_scale: size,
            marker_scale: size,
            label_scale: size,
            badge_scale: 0.75 * size,
            min_interval: 60.0 * size,
            margin: 30.0 * size,
        }
    }

    /// Set [`RenderOpts::theme`].
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set [`RenderOpts::one_way`].
    pub fn with_one_way(mut self, one_way: bool) -> Self {
        self.one_way = one_way;
        self
    }

    /// Set [`RenderOpts::path_scale`].
    pub fn with_path_scale(mut self, scale: f64) -> Self {
        self.path_scale = scale;
        self
    }

    /// Set [`RenderOpts::marker_scale`].
    pub fn with_marker_scale(mut self, scale: f64) -> Self {
        self.marker_scale = scale;
        self
    }

    /// Set [`RenderOpts::label_scale`].
    pub fn with_label_scale(mut self, scale: f64) -> Self {
        self.label_scale = scale;
        self
    }

    /// Set [`RenderOpts::badge_scale`].
    pub fn with_badge_scale(mut self, scale: f64) -> Self {
        self.badge_scale = scale;
        self
    }

    /// Set [`RenderOpts::min_interval`].
    pub fn with_min_interval(mut self, min_interval: f64) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Set [`RenderOpts::margin`].
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

/// Whether a route whose ends lie this far apart should be drawn one-way.
pub fn suggest_one_way(points: &[Point]) -> bool {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => distance(*a, *b) > ONE_WAY_GAP,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
