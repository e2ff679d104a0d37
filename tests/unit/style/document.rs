use super::*;
use serde_json::json;

fn sample() -> StyleDocument {
    StyleDocument::from_value(json!({
        "version": 8,
        "name": "Transit",
        "sources": {
            "composite": {"type": "vector", "url": "mapbox://mapbox.mapbox-streets-v8"}
        },
        "layers": [
            {"id": "land", "type": "background", "paint": {"background-color": "#f8f4f0"}},
            {
                "id": "road-street",
                "type": "line",
                "source-layer": "road",
                "minzoom": 13,
                "filter": ["==", ["get", "class"], "street"],
                "paint": {"line-color": "#ffffff", "line-width": 2},
                "layout": {"line-cap": "round"}
            },
            {"id": "hills", "type": "hillshade", "source-layer": "hillshade"},
            {
                "id": "poi-label",
                "type": "symbol",
                "source-layer": "poi_label",
                "layout": {"text-font": ["Noto Sans Regular"], "text-field": ["get", "name"]}
            }
        ]
    }))
    .unwrap()
}

#[test]
fn layers_keep_order_and_kind() {
    let doc = sample();
    let ids: Vec<_> = doc.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, ["land", "road-street", "hills", "poi-label"]);
    assert_eq!(doc.layers[0].kind, LayerKind::Background);
    assert_eq!(doc.layers[2].kind, LayerKind::Other("hillshade".to_string()));
    assert_eq!(doc.name.as_deref(), Some("Transit"));
}

#[test]
fn expressions_are_parsed_at_load() {
    let doc = sample();
    let road = doc.layer("road-street").unwrap();
    assert_eq!(road.source_layer.as_deref(), Some("road"));
    assert!(matches!(road.filter, Some(Expr::Compare(..))));
    assert!(road.paint.contains("line-width"));
    assert!(road.below_min_zoom(12));
    assert!(!road.below_min_zoom(13));

    let label = doc.layer("poi-label").unwrap();
    assert_eq!(label.layout.raw("text-font"), Some(&json!(["Noto Sans Regular"])));
    assert!(label.paint.is_empty());
}

#[test]
fn vector_source_strips_scheme() {
    assert_eq!(sample().vector_source().unwrap(), "mapbox.mapbox-streets-v8");

    let raster = StyleDocument::from_value(json!({
        "layers": [],
        "sources": {"composite": {"type": "raster", "url": "mapbox://x"}}
    }))
    .unwrap();
    assert!(matches!(raster.vector_source(), Err(RouteMapError::Validation(_))));

    let https = StyleDocument::from_value(json!({
        "layers": [],
        "sources": {"composite": {"type": "vector", "url": "https://tiles.example/x"}}
    }))
    .unwrap();
    assert!(https.vector_source().is_err());
}

#[test]
fn layer_without_id_is_a_serde_error() {
    let err = StyleDocument::from_json(r#"{"layers": [{"type": "fill"}]}"#).unwrap_err();
    assert!(matches!(err, RouteMapError::Serde(_)));
}
