use super::*;
use crate::tile::model::Geometry;
use serde_json::json;

const CTX: EvalCtx = EvalCtx {
    zoom: 13,
    x: 6983,
    y: 3171,
};

fn road() -> Feature {
    Feature::new(Geometry::MultiLineString(vec![]))
        .with_property("class", json!("street"))
        .with_property("rank", json!(3))
}

fn eval(expr: serde_json::Value) -> RouteMapResult<Value> {
    evaluate(&Expr::parse(&expr), Some(&road()), &CTX)
}

#[test]
fn get_returns_zero_for_missing_property() {
    assert_eq!(eval(json!(["get", "name"])).unwrap(), Value::Number(0.0));
    assert_eq!(eval(json!(["get", "class"])).unwrap(), Value::from("street"));
    assert_eq!(
        evaluate(&Expr::parse(&json!(["get", "class"])), None, &CTX).unwrap(),
        Value::Number(0.0)
    );
}

#[test]
fn has_and_logic() {
    assert_eq!(eval(json!(["has", "rank"])).unwrap(), Value::Bool(true));
    assert_eq!(
        eval(json!(["all", ["has", "rank"], [">", ["get", "rank"], 2]])).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        eval(json!(["any", ["==", ["get", "class"], "path"], ["!", ["has", "rank"]]])).unwrap(),
        Value::Bool(false)
    );
    assert_eq!(eval(json!(["all"])).unwrap(), Value::Bool(true));
    assert_eq!(eval(json!(["any"])).unwrap(), Value::Bool(false));
}

#[test]
fn comparisons_reject_mixed_ordering() {
    assert_eq!(eval(json!(["<", "a", "b"])).unwrap(), Value::Bool(true));
    assert_eq!(eval(json!(["==", "1", 1])).unwrap(), Value::Bool(false));
    assert!(matches!(
        eval(json!(["<", "a", 1])),
        Err(RouteMapError::Evaluation(_))
    ));
}

#[test]
fn arithmetic() {
    assert_eq!(eval(json!(["*", ["get", "rank"], 2])).unwrap(), Value::Number(6.0));
    assert_eq!(eval(json!(["sqrt", 16])).unwrap(), Value::Number(4.0));
    assert_eq!(eval(json!(["+", "a", "b"])).unwrap(), Value::from("ab"));
    assert!(eval(json!(["/", 1, 0])).is_err());
    assert!(eval(json!(["sqrt", -1])).is_err());
    assert_eq!(eval(json!(["+", ["zoom"], 1])).unwrap(), Value::Number(14.0));
}

#[test]
fn coercions() {
    assert_eq!(eval(json!(["to-number", 2.7])).unwrap(), Value::Number(2.0));
    assert_eq!(eval(json!(["to-number", " 42 "])).unwrap(), Value::Number(42.0));
    assert_eq!(eval(json!(["to-number", true])).unwrap(), Value::Number(1.0));
    assert!(eval(json!(["to-number", "4.5"])).is_err());
    assert_eq!(eval(json!(["to-string", ["get", "rank"]])).unwrap(), Value::from("3"));
}

#[test]
fn match_falls_back_to_default() {
    let m = json!(["match", ["get", "class"], ["path", "track"], 1, "motorway", 2, 9]);
    assert_eq!(eval(m).unwrap(), Value::Number(9.0));
    let m = json!(["match", ["get", "class"], ["path", "street"], 1, 9]);
    assert_eq!(eval(m).unwrap(), Value::Number(1.0));
}

#[test]
fn case_and_coalesce() {
    let c = json!(["case", ["==", ["get", "rank"], 1], "a", ["==", ["get", "rank"], 3], "b", "c"]);
    assert_eq!(eval(c).unwrap(), Value::from("b"));
    assert_eq!(
        eval(json!(["coalesce", ["get", "name"], "", ["get", "class"]])).unwrap(),
        Value::from("street")
    );
    assert_eq!(eval(json!(["coalesce", ["get", "name"], ""])).unwrap(), Value::from(""));
}

#[test]
fn step_takes_last_threshold_at_or_below() {
    let s = |z: u8| {
        let ctx = EvalCtx { zoom: z, ..CTX };
        evaluate(&Expr::parse(&json!(["step", ["zoom"], 1, 12, 2, 14, 3])), None, &ctx).unwrap()
    };
    assert_eq!(s(11), Value::Number(1.0));
    assert_eq!(s(12), Value::Number(2.0));
    assert_eq!(s(13), Value::Number(2.0));
    assert_eq!(s(16), Value::Number(3.0));
}

#[test]
fn interpolate_blends_numbers_and_colors() {
    let at = |v: f64, stops: serde_json::Value| {
        let mut e = vec![json!("interpolate"), json!(["linear"]), json!(v)];
        e.extend(stops.as_array().unwrap().iter().cloned());
        evaluate(&Expr::parse(&json!(e)), None, &CTX).unwrap()
    };

    assert_eq!(at(5.0, json!([0, 0, 10, 20])), Value::Number(10.0));
    assert_eq!(at(-1.0, json!([0, 0, 10, 20])), Value::Number(0.0));
    assert_eq!(at(10.0, json!([0, 0, 10, 20])), Value::Number(20.0));
    assert_eq!(at(5.0, json!([0, "#000000", 10, "#ffffff"])), Value::from("#7f7f7f"));
}

#[test]
fn non_linear_interpolation_is_linear() {
    let e = json!(["interpolate", ["exponential", 1.5], 5, 0, 0, 10, 20]);
    assert_eq!(eval(e).unwrap(), Value::Number(10.0));
}

#[test]
fn geometry_type_is_normalized() {
    assert_eq!(eval(json!(["geometry-type"])).unwrap(), Value::from("LineString"));
}

#[test]
fn at_never_succeeds() {
    // Two declared arguments, yet the array is read from a third.
    assert!(matches!(
        eval(json!(["at", 0, ["literal", ["a", "b"]]])),
        Err(RouteMapError::Evaluation(_))
    ));
    assert!(eval(json!(["at", 0, ["a"], "extra"])).is_err());
}

#[test]
fn unsupported_and_malformed_fail_on_evaluation() {
    match eval(json!(["format", "x"])) {
        Err(RouteMapError::Expression(msg)) => assert!(msg.contains("format"), "{msg}"),
        other => panic!("expected expression error, got {other:?}"),
    }
    assert!(matches!(
        eval(json!(["has", "a", "b"])),
        Err(RouteMapError::Expression(_))
    ));
}

#[test]
fn colors_and_numbers_resolve() {
    let e = Expr::parse(&json!(["match", ["get", "class"], "street", "hsl(0, 0%, 100%)", "#000"]));
    assert_eq!(evaluate_color(&e, Some(&road()), &CTX).unwrap(), "#ffffff");
    assert!(matches!(
        evaluate_color(&Expr::parse(&json!(3)), None, &CTX),
        Err(RouteMapError::Color(_))
    ));
    assert_eq!(evaluate_number(&Expr::parse(&json!(true)), None, &CTX).unwrap(), 1.0);
}
