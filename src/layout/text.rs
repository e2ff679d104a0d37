use std::collections::HashMap;
use std::sync::Mutex;

use crate::foundation::error::{RouteMapError, RouteMapResult};

/// Measurement size; widths are reported per em.
const MEASURE_PX: f32 = 100.0;

/// Typefaces the schematic measures text in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Stop label face (KoPubDotum Bold).
    StopLabel,
    /// Bold badge face for Hangul runs and termini (NanumSquare Bold).
    BadgeBold,
    /// Regular badge face (NanumSquare).
    BadgeRegular,
    /// Route number face (Din Medium).
    Numeral,
}

impl FontFace {
    /// Family name written into generated SVG.
    pub fn family(self) -> &'static str {
        match self {
            Self::StopLabel => "KoPubDotum Bold",
            Self::BadgeBold | Self::BadgeRegular => "NanumSquare",
            Self::Numeral => "Din Medium",
        }
    }
}

/// Advance width of a run of text, in em units.
pub trait TextMetrics {
    /// Width of `text` set in `face`.
    fn width(&self, text: &str, face: FontFace) -> f64;
}

/// Character-class width table used when no font is available.
///
/// Narrow punctuation `.()` is 0.2 em, lowercase latin, digits and `-` are
/// 0.6 em, uppercase latin is 0.8 em and everything else, including spaces
/// and Hangul, is a full em.
#[derive(Clone, Copy, Debug, Default)]
pub struct FallbackMetrics;

impl FallbackMetrics {
    /// Width of `c` in em.
    pub fn char_width(c: char) -> f64 {
        match c {
            '.' | '(' | ')' => 0.2,
            '0'..='9' | 'a'..='z' | '-' => 0.6,
            'A'..='Z' => 0.8,
            _ => 1.0,
        }
    }
}

impl TextMetrics for FallbackMetrics {
    fn width(&self, text: &str, _face: FontFace) -> f64 {
        text.chars().map(Self::char_width).sum()
    }
}

struct LayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    families: HashMap<FontFace, String>,
}

impl LayoutEngine {
    fn measure(&mut self, text: &str, family: String) -> f64 {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(MEASURE_PX));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        let advance = layout
            .lines()
            .map(|line| line.metrics().advance)
            .fold(0.0f32, f32::max);
        f64::from(advance / MEASURE_PX)
    }
}

/// Font-backed metrics shaped with `parley`.
///
/// Faces without registered font bytes are measured with [`FallbackMetrics`].
pub struct FontMetrics {
    engine: Mutex<LayoutEngine>,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMetrics {
    /// Metrics with no fonts registered; every face uses the fallback table.
    pub fn new() -> Self {
        Self {
            engine: Mutex::new(LayoutEngine {
                font_ctx: parley::FontContext::default(),
                layout_ctx: parley::LayoutContext::new(),
                families: HashMap::new(),
            }),
        }
    }

    /// Register raw font bytes (TTF/OTF) for `face`.
    pub fn register(&self, face: FontFace, font_bytes: &[u8]) -> RouteMapResult<()> {
        let mut engine = self
            .engine
            .lock()
            .map_err(|_| RouteMapError::validation("font metrics lock poisoned"))?;

        let families = engine
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            RouteMapError::validation(format!("no font families registered for {face:?}"))
        })?;
        let family_name = engine
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RouteMapError::validation("registered font family has no name"))?
            .to_string();

        tracing::debug!(?face, family = %family_name, "registered font");
        engine.families.insert(face, family_name);
        Ok(())
    }

    /// Whether a font was registered for `face`.
    pub fn has_face(&self, face: FontFace) -> bool {
        self.engine
            .lock()
            .map(|e| e.families.contains_key(&face))
            .unwrap_or(false)
    }
}

impl TextMetrics for FontMetrics {
    fn width(&self, text: &str, face: FontFace) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Ok(mut engine) = self.engine.lock() else {
            return FallbackMetrics.width(text, face);
        };
        match engine.families.get(&face).cloned() {
            Some(family) => engine.measure(text, family),
            None => FallbackMetrics.width(text, face),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
