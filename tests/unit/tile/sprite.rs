use super::*;

const BUS: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="12" height="10" viewBox="0 0 12 10"><rect x="1" y="1" width="10" height="8" fill="#3d5bab"/></svg>"##;

fn cache_with(source: &Arc<MemorySpriteSource>) -> SpriteCache {
    SpriteCache::new(Arc::clone(source) as Arc<dyn SpriteSource>)
}

#[test]
fn parses_body_and_size() {
    let sprite = Sprite::parse(BUS).unwrap();
    assert_eq!(sprite.width, 12.0);
    assert_eq!(sprite.height, 10.0);
    assert_eq!(
        sprite.body,
        r##"<rect x="1" y="1" width="10" height="8" fill="#3d5bab"/>"##
    );
}

#[test]
fn rejects_non_svg() {
    assert!(Sprite::parse("<html></html>").is_err());
}

#[test]
fn loads_each_id_once() {
    let source = Arc::new(MemorySpriteSource::new().with_sprite("bus", BUS));
    let cache = cache_with(&source);

    let a = cache.get("bus").unwrap();
    let b = cache.get("bus").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(source.load_count(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn concurrent_gets_share_one_load() {
    let source = Arc::new(MemorySpriteSource::new().with_sprite("bus", BUS));
    let cache = cache_with(&source);

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| cache.get("bus").unwrap());
        }
    });
    assert_eq!(source.load_count(), 1);
}

#[test]
fn missing_sprite_is_not_cached() {
    let source = Arc::new(MemorySpriteSource::new());
    let cache = cache_with(&source);

    match cache.get("ferry") {
        Err(RouteMapError::Evaluation(msg)) => assert!(msg.contains("ferry"), "{msg}"),
        other => panic!("expected missing sprite error, got {other:?}"),
    }
    assert!(cache.is_empty());
}
