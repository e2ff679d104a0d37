use crate::foundation::core::Point;
use crate::geo::geometry::{expand_window, min_distance_to_polyline};

/// Consecutive far points needed to close an open shared run.
const CLOSE_AFTER: usize = 3;

/// Inclusive index range of route points drawn as one path fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRun {
    /// First point index.
    pub first: usize,
    /// Last point index, inclusive.
    pub last: usize,
}

impl PathRun {
    /// Run covering `first..=last`; `last < first` is an empty run.
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Number of points in the run.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.last + 1 - self.first
    }

    /// True when `last < first`.
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    /// Points of the run, clamped to `points`.
    pub fn slice<'a>(&self, points: &'a [Point]) -> &'a [Point] {
        if self.is_empty() || self.first >= points.len() {
            return &[];
        }
        &points[self.first..=self.last.min(points.len() - 1)]
    }
}

/// The drawn extent of a route split at its turnback point.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteLegs {
    /// Outbound leg, `start..=turnback`.
    pub outbound: PathRun,
    /// Inbound leg, `turnback..=end`.
    pub inbound: PathRun,
}

impl RouteLegs {
    /// Legs meeting at `turnback`; `start` and `end` are clamped around it.
    pub fn new(start: usize, turnback: usize, end: usize) -> Self {
        let start = start.min(turnback);
        let end = end.max(turnback);
        Self {
            outbound: PathRun::new(start, turnback),
            inbound: PathRun::new(turnback, end),
        }
    }

    /// The whole drawn route from the first stop to the last.
    pub fn full(&self) -> PathRun {
        PathRun::new(self.outbound.first, self.inbound.last)
    }
}

/// Runs of the inbound leg that retrace the outbound leg.
///
/// Inbound points within `threshold` of the outbound polyline open or extend a
/// run; the run closes once [`CLOSE_AFTER`] consecutive points lie beyond
/// `2 * threshold`. Each run is widened with [`expand_window`] at
/// `2 * threshold` and clamped to the inbound leg. Runs that cover fewer than
/// two points are dropped.
pub fn shared_runs(points: &[Point], legs: &RouteLegs, threshold: f64) -> Vec<PathRun> {
    let outbound = legs.outbound.slice(points);
    let inbound = legs.inbound;

    let mut runs = Vec::new();
    let mut open: Option<PathRun> = None;
    let mut far = 0usize;

    for (i, p) in points
        .iter()
        .enumerate()
        .take(inbound.last + 1)
        .skip(inbound.first + 1)
    {
        let d = min_distance_to_polyline(*p, outbound).unwrap_or(f64::INFINITY);
        if d <= threshold {
            open = Some(match open {
                Some(run) => PathRun::new(run.first, i),
                None => PathRun::new(i, i),
            });
            far = 0;
            continue;
        }

        let Some(run) = open else {
            continue;
        };
        if d > 2.0 * threshold {
            far += 1;
            if far >= CLOSE_AFTER {
                runs.extend(widen(points, run, inbound, threshold));
                open = None;
                far = 0;
            }
        } else {
            far = 0;
        }
    }

    if let Some(run) = open {
        runs.extend(widen(points, run, inbound, threshold));
    }

    tracing::trace!(count = runs.len(), "shared inbound runs");
    runs
}

fn widen(points: &[Point], run: PathRun, bounds: PathRun, threshold: f64) -> Option<PathRun> {
    let (prev, next) = expand_window(points, run.first, run.last, 2.0 * threshold);
    let run = PathRun::new(prev.max(bounds.first), next.min(bounds.last));
    (run.last > run.first).then_some(run)
}

#[cfg(test)]
#[path = "../../tests/unit/route/legs.rs"]
mod tests;
