use super::*;
use serde_json::json;

#[test]
fn non_operator_arrays_are_literals() {
    assert_eq!(
        Expr::parse(&json!([1, 2])),
        Expr::Literal(Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]))
    );
    assert_eq!(Expr::parse(&json!("#fff")), Expr::Literal(Value::from("#fff")));
    assert_eq!(
        Expr::parse(&json!(["literal", ["a", "b"]])),
        Expr::Literal(Value::Array(vec![Value::from("a"), Value::from("b")]))
    );
}

#[test]
fn unknown_operators_parse_as_unsupported() {
    assert_eq!(
        Expr::parse(&json!(["format", ["get", "name"]])),
        Expr::Unsupported("format".to_string())
    );
}

#[test]
fn parses_comparisons_and_access() {
    assert_eq!(
        Expr::parse(&json!(["==", ["get", "class"], "street"])),
        Expr::Compare(
            CompareOp::Eq,
            Box::new(Expr::Get("class".to_string())),
            Box::new(Expr::Literal(Value::from("street")))
        )
    );
    assert_eq!(Expr::parse(&json!(["zoom"])), Expr::Zoom);
    assert_eq!(Expr::parse(&json!(["has", "name"])), Expr::Has("name".to_string()));
}

#[test]
fn parses_match_arms() {
    let e = Expr::parse(&json!(["match", ["get", "class"], ["a", "b"], 1, "c", 2, 0]));
    let Expr::Match { arms, default, .. } = e else {
        panic!("expected match, got {e:?}");
    };
    assert_eq!(arms.len(), 2);
    assert_eq!(arms[0].0, Value::Array(vec![Value::from("a"), Value::from("b")]));
    assert_eq!(arms[1].1, Expr::Literal(Value::Number(2.0)));
    assert_eq!(*default, Expr::Literal(Value::Number(0.0)));
}

#[test]
fn parses_step_and_interpolate_stops() {
    let step = Expr::parse(&json!(["step", ["zoom"], 1, 10, 2, 14, 3]));
    assert!(matches!(step, Expr::Step { ref stops, .. } if stops.len() == 2 && stops[1].0 == 14.0));

    let interp = Expr::parse(&json!(["interpolate", ["linear"], ["zoom"], 0, "#000", 10, "#fff"]));
    let Expr::Interpolate { method, stops, .. } = interp else {
        panic!("expected interpolate");
    };
    assert_eq!(method, Value::Array(vec![Value::from("linear")]));
    assert_eq!(stops.len(), 2);
}

#[test]
fn malformed_shapes_are_kept_until_evaluated() {
    for bad in [
        json!(["has", "a", "b"]),
        json!(["interpolate", ["linear"], ["zoom"], 0, 1, 10]),
        json!(["step", ["zoom"], 1, "ten", 2]),
        json!(["get"]),
        json!(["==", 1]),
        json!(["match", ["get", "a"], "x", 1]),
    ] {
        assert!(
            matches!(Expr::parse(&bad), Expr::Malformed(_)),
            "{bad} should be malformed"
        );
    }
}
