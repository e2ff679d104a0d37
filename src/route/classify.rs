//! Stop classification: turnback detection and major/minor stop selection.

use crate::foundation::core::Point;
use crate::foundation::error::{RouteMapError, RouteMapResult};
use crate::geo::geometry::{min_distance_to_points, min_distance_to_polyline, nearest_point};
use crate::geo::projection::project;
use crate::layout::labels::LabelDirection;
use crate::route::model::BusStop;
use crate::route::names::{canonical_stop_name, is_pass_stop};

/// Leg of a round-trip route a stop belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// Before the turnback stop.
    Outbound,
    /// After the turnback stop.
    Inbound,
}

impl Section {
    /// Numeric section as used by the label and color rules: 0 outbound, 1 inbound.
    pub fn index(self) -> u8 {
        match self {
            Self::Outbound => 0,
            Self::Inbound => 1,
        }
    }
}

/// Where a route turns around, both as a stop index and a path index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Turnback {
    /// Index into the stop sequence.
    pub stop: usize,
    /// Index of the route point nearest to that stop.
    pub point: usize,
}

impl Turnback {
    /// Find the turnback from the agency transfer flag.
    ///
    /// Routes without a flagged stop fall back to the final stop when they are
    /// treated as one-way; otherwise the data is rejected.
    pub fn locate(stops: &[BusStop], points: &[Point], one_way: bool) -> RouteMapResult<Self> {
        let flagged = stops.iter().position(|s| s.is_transfer);
        let stop = match flagged {
            Some(i) => i,
            None if one_way && !stops.is_empty() => stops.len() - 1,
            None => {
                return Err(RouteMapError::validation(
                    "route has no turnback stop and is not one-way",
                ));
            }
        };
        Self::at(stop, stops, points)
    }

    /// Use `stop` as the turnback, checking it against the stop sequence.
    pub fn at(stop: usize, stops: &[BusStop], points: &[Point]) -> RouteMapResult<Self> {
        let Some(turnback) = stops.get(stop) else {
            return Err(RouteMapError::validation(format!(
                "turnback index {stop} out of range for {} stops",
                stops.len()
            )));
        };
        let point = nearest_point(project(turnback.pos), points)?;
        Ok(Self { stop, point })
    }
}

/// A stop selected for display, with everything the renderer needs.
#[derive(Clone, Debug, PartialEq)]
pub struct StopAnnotation {
    /// Index into the stop sequence.
    pub ord: usize,
    /// Projected stop position.
    pub pos: Point,
    /// Display name: canonical for major stops, raw for minor ones.
    pub name: String,
    /// Leg the stop is drawn on.
    pub section: Section,
    /// Pass-through stop, drawn muted.
    pub pass: bool,
    /// Forced label side; `None` lets placement choose.
    pub direction: Option<LabelDirection>,
}

/// Thresholds steering classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifyOpts {
    /// Treat the final stop as the last labeled terminus.
    pub one_way: bool,
    /// Minimum distance between two labeled stops.
    pub min_interval: f64,
}

/// Select the stops to draw, in label-placement order.
///
/// The first stop and the last labeled stop come first, then the remaining
/// station and hub stops by index, then the ordinary stops that keep
/// `min_interval` clear of everything placed before them. A station name
/// already used by an earlier stop drops that stop altogether.
///
/// A `turnback` pointing past either sequence is rejected.
pub fn classify_stops(
    stops: &[BusStop],
    points: &[Point],
    turnback: Turnback,
    opts: ClassifyOpts,
) -> RouteMapResult<Vec<StopAnnotation>> {
    if stops.is_empty() {
        return Ok(Vec::new());
    }
    if turnback.stop >= stops.len() {
        return Err(RouteMapError::validation(format!(
            "turnback stop {} out of range for {} stops",
            turnback.stop,
            stops.len()
        )));
    }
    if turnback.point >= points.len() {
        return Err(RouteMapError::validation(format!(
            "turnback point {} out of range for {} route points",
            turnback.point,
            points.len()
        )));
    }

    let last = if opts.one_way {
        stops.len() - 1
    } else {
        turnback.stop
    };
    // Same outbound prefix as `leg_point`: never empty, even at point 0.
    let outbound = &points[..turnback.point.max(1)];
    let section_of = |i: usize| {
        if i > turnback.stop {
            Section::Inbound
        } else {
            Section::Outbound
        }
    };
    let annotate = |i: usize, name: String, section: Section| StopAnnotation {
        ord: i,
        pos: project(stops[i].pos),
        name,
        section,
        pass: is_pass_stop(&stops[i].name),
        direction: None,
    };

    let mut used_names: Vec<String> = Vec::new();
    let mut majors: Vec<StopAnnotation> = Vec::new();

    let termini: &[usize] = if last == 0 { &[0] } else { &[0, last] };
    for &i in termini {
        let name = canonical_stop_name(&stops[i].name).name;
        used_names.push(name.clone());
        majors.push(annotate(i, name, section_of(i)));
    }

    for (i, stop) in stops.iter().enumerate() {
        let canonical = canonical_stop_name(&stop.name);
        if !canonical.is_major || used_names.contains(&canonical.name) {
            continue;
        }
        used_names.push(canonical.name.clone());

        let mut annotation = annotate(i, canonical.name, section_of(i));
        if annotation.section == Section::Inbound {
            let near_outbound = min_distance_to_polyline(annotation.pos, outbound)
                .is_some_and(|d| d < opts.min_interval / 8.0);
            if near_outbound {
                annotation.section = Section::Outbound;
            }
        }
        majors.push(annotation);
    }

    let mut minors: Vec<StopAnnotation> = Vec::new();
    for (i, stop) in stops.iter().enumerate() {
        // Station stops are either majors already or suppressed duplicates.
        if majors.iter().any(|m| m.ord == i) || canonical_stop_name(&stop.name).is_major {
            continue;
        }

        let pos = project(stop.pos);
        if i > turnback.stop {
            let retraces = min_distance_to_polyline(pos, outbound)
                .is_some_and(|d| d < opts.min_interval / 4.0);
            if retraces {
                continue;
            }
        }

        let placed: Vec<Point> = majors.iter().chain(minors.iter()).map(|s| s.pos).collect();
        let clear = min_distance_to_points(pos, &placed).is_none_or(|d| d > opts.min_interval);
        if clear {
            minors.push(annotate(i, stop.name.clone(), section_of(i)));
        }
    }

    tracing::debug!(majors = majors.len(), minors = minors.len(), "classified stops");
    majors.extend(minors);
    Ok(majors)
}

#[cfg(test)]
#[path = "../../tests/unit/route/classify.rs"]
mod tests;
