use super::*;
use crate::geo::projection::unproject;
use crate::layout::text::FallbackMetrics;

fn route(name: &str) -> RouteInfo {
    RouteInfo {
        route_type: 3,
        name: name.to_string(),
        start: "기점".to_string(),
        end: "회차".to_string(),
    }
}

fn stop(name: &str, x: f64, y: f64, is_transfer: bool) -> BusStop {
    BusStop {
        id: name.to_string(),
        name: name.to_string(),
        pos: unproject(Point::new(x, y)),
        is_transfer,
    }
}

fn retraced_points() -> Vec<Point> {
    let mut xs: Vec<f64> = (0..=10).map(|i| f64::from(i) * 100.0).collect();
    xs.extend((0..=9).rev().map(|i| f64::from(i) * 100.0));
    xs.into_iter().map(|x| Point::new(x, 0.0)).collect()
}

fn round_trip(name: &str) -> RouteMap {
    let stops = vec![
        stop("기점", 0.0, 0.0, false),
        stop("회차", 1000.0, 0.0, true),
        stop("종점", 0.0, 0.0, false),
    ];
    RouteMap::from_points(route(name), stops, retraced_points(), RenderOpts::default()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn depot_angle_turns_clockwise() {
    assert!(close(depot_angle(Vec2::new(1.0, 0.0)), 0.0));
    assert!(close(depot_angle(Vec2::new(0.0, 1.0)), 90.0));
    assert!(close(depot_angle(Vec2::new(-1.0, 0.0)), 180.0));
    assert!(close(depot_angle(Vec2::new(0.0, -1.0)), 270.0));
    assert!(close(depot_angle(Vec2::ZERO), 0.0));
}

#[test]
fn empty_geometry_is_rejected() {
    let stops = vec![stop("A", 0.0, 0.0, true)];
    let err = RouteMap::new(route("1"), stops, &[], RenderOpts::default()).unwrap_err();
    assert!(matches!(err, RouteMapError::Geometry(_)));
}

#[test]
fn overrides_are_validated() {
    let map = round_trip("472");
    assert!(matches!(
        map.clone().with_label_direction(9, 0),
        Err(RouteMapError::Validation(_))
    ));
    assert!(matches!(
        map.clone().with_label_direction(1, 4),
        Err(RouteMapError::Validation(_))
    ));
    assert!(matches!(
        map.clone().with_turnback(3),
        Err(RouteMapError::Validation(_))
    ));
    let moved = map.with_turnback(0).unwrap();
    assert_eq!(moved.turnback(), Turnback { stop: 0, point: 0 });
}

#[test]
fn retraced_route_draws_dark_run_beneath_line() {
    let out = round_trip("472").render(&FallbackMetrics).unwrap();
    assert_eq!(out.svg.matches("<path style=\"stroke:").count(), 2);

    let dark = out.svg.find("stroke:#263c77;display:inline").unwrap();
    let line = out.svg.find("stroke:#3d5bab;display:inline").unwrap();
    assert!(dark < line);
    assert!(out.svg.contains("stroke-width:14;"));
    assert!(out.svg.contains("stroke-width:8;"));
}

#[test]
fn one_way_route_has_single_path() {
    let stops = vec![
        stop("기점", 0.0, 0.0, false),
        stop("회차", 1000.0, 0.0, true),
        stop("종점", 0.0, 0.0, false),
    ];
    let opts = RenderOpts::default().with_one_way(true);
    let map = RouteMap::from_points(route("472"), stops, retraced_points(), opts).unwrap();
    let out = map.render(&FallbackMetrics).unwrap();
    assert_eq!(out.svg.matches("<path style=\"stroke:").count(), 1);
}

#[test]
fn night_route_markers_are_yellow() {
    let out = round_trip("N26").render(&FallbackMetrics).unwrap();
    let circles = out.svg.matches("<circle style=\"fill:#ffcc00;").count();
    assert_eq!(circles, out.stops.len());
    assert!(out.svg.contains("fill:#ffcc00\">N</text>"));
}

#[test]
fn forced_direction_reaches_the_label() {
    let map = round_trip("472").with_label_direction(1, 3).unwrap();
    let out = map.render(&FallbackMetrics).unwrap();
    let (i, turn) = out
        .stops
        .iter()
        .enumerate()
        .find(|(_, s)| s.ord == 1)
        .unwrap();
    assert_eq!(turn.direction, Some(LabelDirection::Right));
    assert!(out.label_rects[i].x0 >= turn.pos.x);
}

#[test]
fn frame_covers_labels_and_badge() {
    let out = round_trip("472").render(&FallbackMetrics).unwrap();
    for rect in &out.label_rects {
        assert!(out.frame.contains_rect(*rect));
    }
    assert!(out.frame.contains_rect(out.badge));
    assert!(close(out.frame.top(), out.badge.y0));
    assert!(out.svg.contains("<g id=\"businfo\""));
    assert!(out.svg.contains("<g id=\"bus_depot_icon\""));
    assert!(out.svg.contains("기점 <tspan"));
}
