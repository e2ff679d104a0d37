use std::fmt::{self, Write as _};

use crate::foundation::core::Point;

/// Escape text for SVG character data and attribute values.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Path data `M x,y L x,y ...` with five decimals per coordinate.
pub fn path_data(points: &[Point]) -> String {
    let mut d = String::from("M");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            d.push_str(" L");
        }
        let _ = write!(d, "{:.5},{:.5}", p.x, p.y);
    }
    d
}

/// A `<path>` element with an inline style.
pub fn path_element(style: &str, points: &[Point]) -> String {
    format!("<path style=\"{style}\" d=\"{}\" />\n", path_data(points))
}

/// Inline CSS declarations in insertion order.
///
/// Renders as `key:value;` pairs; later writes of a key replace the value in
/// place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlineStyle {
    decls: Vec<(&'static str, String)>,
}

impl InlineStyle {
    /// Empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn set(&mut self, key: &'static str, value: impl fmt::Display) -> &mut Self {
        let value = value.to_string();
        match self.decls.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.decls.push((key, value)),
        }
        self
    }

    /// Builder form of [`InlineStyle::set`].
    pub fn with(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.set(key, value);
        self
    }

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when no declaration is set.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, v) in &self.decls {
            write!(f, "{k}:{v};")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
