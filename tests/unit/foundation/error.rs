use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RouteMapError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        RouteMapError::geometry("x")
            .to_string()
            .contains("geometry error:")
    );
    assert!(
        RouteMapError::expression("x")
            .to_string()
            .contains("expression error:")
    );
    assert!(RouteMapError::color("x").to_string().contains("color error:"));
    assert!(
        RouteMapError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        RouteMapError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RouteMapError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: RouteMapError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, RouteMapError::Serde(_)));
}
