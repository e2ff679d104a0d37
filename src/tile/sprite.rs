//! Symbol sprites: SVG icons referenced by `icon-image`, loaded once per id.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use anyhow::Context;
use regex::Regex;

use crate::foundation::error::{RouteMapError, RouteMapResult};

fn body_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)<svg\b[^>]*>(.*)</svg>").expect("svg body pattern is valid"))
}

/// A parsed sprite: inner markup of its root `<svg>` plus its size.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Markup inside the root element.
    pub body: String,
    /// Intrinsic width.
    pub width: f64,
    /// Intrinsic height.
    pub height: f64,
}

impl Sprite {
    /// Parse sprite SVG text.
    pub fn parse(svg: &str) -> RouteMapResult<Self> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_str(svg, &opts).context("parse sprite svg")?;
        let size = tree.size();

        let body = body_pattern()
            .captures(svg)
            .and_then(|c| c.get(1))
            .ok_or_else(|| RouteMapError::evaluation("sprite has no <svg> root element"))?;

        Ok(Self {
            body: body.as_str().to_string(),
            width: f64::from(size.width()),
            height: f64::from(size.height()),
        })
    }
}

/// Supplies raw sprite SVG text by identifier.
pub trait SpriteSource: Send + Sync {
    /// SVG text of sprite `id`.
    fn load(&self, id: &str) -> RouteMapResult<String>;
}

/// Sprites held in memory; counts loads so callers can observe caching.
#[derive(Debug, Default)]
pub struct MemorySpriteSource {
    sprites: HashMap<String, String>,
    loads: AtomicUsize,
}

impl MemorySpriteSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add sprite `id` with its SVG text.
    pub fn with_sprite(mut self, id: impl Into<String>, svg: impl Into<String>) -> Self {
        self.sprites.insert(id.into(), svg.into());
        self
    }

    /// Number of `load` calls so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

impl SpriteSource for MemorySpriteSource {
    fn load(&self, id: &str) -> RouteMapResult<String> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.sprites
            .get(id)
            .cloned()
            .ok_or_else(|| RouteMapError::evaluation(format!("missing sprite \"{id}\"")))
    }
}

/// Sprites stored as `<root>/<id>.svg`.
#[derive(Clone, Debug)]
pub struct DirSpriteSource {
    root: PathBuf,
}

impl DirSpriteSource {
    /// Source reading `<root>/<id>.svg`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SpriteSource for DirSpriteSource {
    fn load(&self, id: &str) -> RouteMapResult<String> {
        let path = self.root.join(format!("{id}.svg"));
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("read sprite {}", path.display()))?;
        Ok(text)
    }
}

/// Get-or-populate sprite cache shared across concurrent tile renders.
pub struct SpriteCache {
    source: Arc<dyn SpriteSource>,
    sprites: RwLock<HashMap<String, Arc<Sprite>>>,
}

impl SpriteCache {
    /// Empty cache over `source`.
    pub fn new(source: Arc<dyn SpriteSource>) -> Self {
        Self {
            source,
            sprites: RwLock::new(HashMap::new()),
        }
    }

    /// Cached sprite for `id`, loading and parsing it on first use.
    pub fn get(&self, id: &str) -> RouteMapResult<Arc<Sprite>> {
        if let Some(sprite) = self
            .sprites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return Ok(Arc::clone(sprite));
        }

        // Re-check under the write lock so racing renders load each id once.
        let mut sprites = self.sprites.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(sprite) = sprites.get(id) {
            return Ok(Arc::clone(sprite));
        }
        tracing::trace!(id, "loading sprite");
        let sprite = Arc::new(Sprite::parse(&self.source.load(id)?)?);
        sprites.insert(id.to_string(), Arc::clone(&sprite));
        Ok(sprite)
    }

    /// Number of cached sprites.
    pub fn len(&self) -> usize {
        self.sprites.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SpriteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteCache")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tile/sprite.rs"]
mod tests;
