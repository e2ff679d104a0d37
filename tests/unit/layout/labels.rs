use super::*;
use crate::layout::text::FallbackMetrics;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn straight_path() -> Vec<Point> {
    (0..=10).map(|i| Point::new(f64::from(i) * 100.0, 0.0)).collect()
}

fn request(anchor: Point, path_index: usize) -> LabelRequest {
    LabelRequest {
        anchor,
        path_index,
        width: 100.0,
        origin: false,
        forced: None,
    }
}

#[test]
fn direction_codes() {
    assert_eq!(LabelDirection::from_index(0).unwrap(), LabelDirection::Up);
    assert_eq!(LabelDirection::from_index(3).unwrap(), LabelDirection::Right);
    assert!(matches!(
        LabelDirection::from_index(4),
        Err(RouteMapError::Validation(_))
    ));
    assert!(LabelDirection::from_index(-1).is_err());
}

#[test]
fn normals_point_to_non_negative_x() {
    assert_eq!(label_normal(Vec2::new(0.0, 1.0)), Vec2::new(1.0, 0.0));
    assert_eq!(label_normal(Vec2::new(0.0, -2.0)), Vec2::new(1.0, 0.0));
    assert_eq!(label_normal(Vec2::new(3.0, 0.0)), Vec2::new(0.0, -1.0));
    let diag = label_normal(Vec2::ZERO);
    assert!(close(diag.x, 0.5f64.sqrt()) && close(diag.y, 0.5f64.sqrt()));
}

#[test]
fn candidate_geometry() {
    let c = candidate_rects(Point::new(100.0, 100.0), Vec2::new(1.0, 0.0), 100.0, 1.0, false);
    let up = c[LabelDirection::Up.index()];
    assert!(close(up.x0, 72.0) && close(up.y0, 66.6));
    assert!(close(up.width(), 56.0) && close(up.height(), 16.8));

    let down = c[LabelDirection::Down.index()];
    assert!(close(down.y0, 116.6));

    let left = c[LabelDirection::Left.index()];
    assert!(close(left.x1, 84.0) && close(left.y0, 91.6));

    let right = c[LabelDirection::Right.index()];
    assert!(close(right.x0, 116.0) && close(right.width(), 56.0));

    let origin = candidate_rects(Point::new(100.0, 100.0), Vec2::new(1.0, 0.0), 100.0, 1.0, true);
    assert!(close(origin[2].width(), 56.0 + 22.4));
    assert!(close(origin[2].x1, 84.0));
    assert!(close(origin[0].width(), 56.0));
}

#[test]
fn vertex_overlap_weighs_four_times() {
    let candidate = Rect::new(0.0, 0.0, 10.0, 10.0);
    let placed = [Rect::new(5.0, 5.0, 15.0, 15.0)];
    assert!(close(collision_score(candidate, &placed, &[]), 25.0));
    // guard box (-2,-2)-(2,2) overlaps 2x2
    assert!(close(collision_score(candidate, &[], &[Point::ZERO]), 16.0));
}

#[test]
fn separated_stops_get_collision_free_labels() {
    let points = straight_path();
    let mut frame = MapFrame::from_points(&points).unwrap();
    let mut board = LabelBoard::new();

    let a = place_label(&request(Point::new(200.0, 0.0), 2), &points, 1.0, &mut board, &mut frame);
    let b = place_label(&request(Point::new(800.0, 0.0), 8), &points, 1.0, &mut board, &mut frame);

    assert_eq!(a.direction, LabelDirection::Up);
    assert_eq!(b.direction, LabelDirection::Up);
    for p in [a, b] {
        assert_eq!(collision_score(p.rect, &[], &points), 0.0);
    }
    assert_eq!(board.placed().len(), 2);
    assert!(frame.contains_rect(a.rect) && frame.contains_rect(b.rect));
}

#[test]
fn crowded_stops_pick_the_lowest_score() {
    let points = straight_path();
    let mut frame = MapFrame::from_points(&points).unwrap();
    let mut board = LabelBoard::new();

    let first = place_label(&request(Point::new(500.0, 0.0), 5), &points, 1.0, &mut board, &mut frame);
    assert_eq!(first.direction, LabelDirection::Up);

    let anchor = Point::new(510.0, 0.0);
    let second = place_label(&request(anchor, 5), &points, 1.0, &mut board, &mut frame);
    assert_eq!(second.direction, LabelDirection::Down);

    let normal = label_normal(path_direction(&points, 5, 10.0));
    let candidates = candidate_rects(anchor, normal, 100.0, 1.0, false);
    let chosen = collision_score(second.rect, &board.placed()[..1], &points);
    for c in candidates {
        assert!(chosen <= collision_score(c, &board.placed()[..1], &points));
    }
}

#[test]
fn origin_label_goes_sideways_and_prefers_left_on_ties() {
    let points = straight_path();
    let mut frame = MapFrame::from_points(&points).unwrap();
    let mut board = LabelBoard::new();
    let req = LabelRequest {
        origin: true,
        ..request(Point::new(500.0, 300.0), 5)
    };
    let p = place_label(&req, &points, 1.0, &mut board, &mut frame);
    assert_eq!(p.direction, LabelDirection::Left);
}

#[test]
fn forced_direction_skips_scoring() {
    let points = straight_path();
    let mut frame = MapFrame::from_points(&points).unwrap();
    let mut board = LabelBoard::new();
    let req = LabelRequest {
        forced: Some(LabelDirection::Right),
        ..request(Point::new(500.0, 0.0), 5)
    };
    let p = place_label(&req, &points, 1.0, &mut board, &mut frame);
    assert_eq!(p.direction, LabelDirection::Right);
    assert!(frame.contains_rect(p.rect));
}

#[test]
fn label_width_counts_suffix_smaller() {
    let text = LabelText::measure("남산(경유)", &FallbackMetrics);
    assert_eq!(text.main, "남산");
    assert_eq!(text.suffix, "(경유)");
    assert!(close(text.width, 2.0 * 30.0 + 2.4 * 24.0 + 30.0));
}

#[test]
fn leg_point_searches_the_stop_leg() {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(200.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(0.0, 0.0),
    ];
    assert_eq!(leg_point(Point::new(100.0, 0.0), &points, 2, false).unwrap(), 1);
    assert_eq!(leg_point(Point::new(100.0, 0.0), &points, 2, true).unwrap(), 3);
    assert_eq!(leg_point(Point::new(100.0, 0.0), &points, 0, false).unwrap(), 0);
}
