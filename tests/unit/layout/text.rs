use super::*;

#[test]
fn fallback_widths_by_character_class() {
    let m = FallbackMetrics;
    assert_eq!(m.width("", FontFace::StopLabel), 0.0);
    assert!((m.width("a1-", FontFace::StopLabel) - 1.8).abs() < 1e-12);
    assert!((m.width("N", FontFace::Numeral) - 0.8).abs() < 1e-12);
    assert!((m.width("(.)", FontFace::StopLabel) - 0.6).abs() < 1e-12);
    assert!((m.width("서울 역", FontFace::BadgeBold) - 3.0).abs() < 1e-12);
}

#[test]
fn unregistered_faces_fall_back_to_table() {
    let m = FontMetrics::new();
    assert!(!m.has_face(FontFace::StopLabel));
    assert_eq!(
        m.width("강남역", FontFace::StopLabel),
        FallbackMetrics.width("강남역", FontFace::StopLabel)
    );
    assert_eq!(m.width("", FontFace::Numeral), 0.0);
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let m = FontMetrics::new();
    let err = m.register(FontFace::Numeral, b"not a font").unwrap_err();
    assert!(matches!(err, RouteMapError::Validation(_)));
    assert!(!m.has_face(FontFace::Numeral));
}

#[test]
fn faces_name_their_families() {
    assert_eq!(FontFace::StopLabel.family(), "KoPubDotum Bold");
    assert_eq!(FontFace::Numeral.family(), "Din Medium");
}
