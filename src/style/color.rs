use std::sync::OnceLock;

use regex::Regex;

use crate::foundation::error::{RouteMapError, RouteMapResult};

/// An sRGB color with normalized `0..=1` channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
}

impl Rgb {
    /// Color from normalized channels.
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, truncating each channel.
    pub fn to_hex(self) -> String {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0) as u8
        }
        format!("#{:02x}{:02x}{:02x}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Linear blend in RGB space; `t = 0` is `self`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

fn hsl_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^hsl\(\s*([0-9]+),\s*([0-9]+)%,\s*([0-9]+)%\s*\)")
            .expect("hsl pattern is valid")
    })
}

fn hsla_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^hsla\(\s*([0-9]+),\s*([0-9]+)%,\s*([0-9]+)%\s*,\s*[0-9.]+\)")
            .expect("hsla pattern is valid")
    })
}

fn rgb_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^rgb\(\s*([0-9]+),\s*([0-9]+),\s*([0-9]+)\s*\)").expect("rgb pattern is valid")
    })
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex pattern is valid")
    })
}

/// Parse a style color literal.
///
/// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `hsl(h, s%, l%)` and
/// `hsla(h, s%, l%, a)`; alpha is ignored.
pub fn parse_color(s: &str) -> RouteMapResult<Rgb> {
    let unknown = || RouteMapError::color(format!("unknown color: \"{s}\""));
    let int = |m: Option<regex::Match<'_>>| -> RouteMapResult<f64> {
        m.and_then(|m| m.as_str().parse::<u32>().ok())
            .map(f64::from)
            .ok_or_else(unknown)
    };

    if let Some(c) = hsl_pattern()
        .captures(s)
        .or_else(|| hsla_pattern().captures(s))
    {
        let h = int(c.get(1))?;
        let sat = int(c.get(2))?;
        let l = int(c.get(3))?;
        return Ok(hsl_to_rgb(h / 360.0, sat / 100.0, l / 100.0));
    }

    if let Some(c) = hex_pattern().captures(s) {
        let digits = c.get(1).map_or("", |m| m.as_str());
        return parse_hex(digits).ok_or_else(unknown);
    }

    if let Some(c) = rgb_pattern().captures(s) {
        return Ok(Rgb::new(
            int(c.get(1))? / 255.0,
            int(c.get(2))? / 255.0,
            int(c.get(3))? / 255.0,
        ));
    }

    Err(unknown())
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    let channel = |s: &str, max: f64| u8::from_str_radix(s, 16).ok().map(|v| f64::from(v) / max);
    match digits.len() {
        3 => Some(Rgb::new(
            channel(&digits[0..1], 15.0)?,
            channel(&digits[1..2], 15.0)?,
            channel(&digits[2..3], 15.0)?,
        )),
        6 => Some(Rgb::new(
            channel(&digits[0..2], 255.0)?,
            channel(&digits[2..4], 255.0)?,
            channel(&digits[4..6], 255.0)?,
        )),
        _ => None,
    }
}

/// Normalized HSL to RGB; `h`, `s` and `l` are all in `0..=1`.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Rgb::new(l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l <= 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    Rgb::new(
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/style/color.rs"]
mod tests;
