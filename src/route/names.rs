//! Stop and route name rules for the Seoul-area transit domain.
//!
//! The tables here are deliberately literal: they mirror how agencies spell
//! station and interchange stops, including the odd corners (only the listed
//! hub suffixes count as hubs, and a name is split on `.` before matching).

use std::sync::OnceLock;

use regex::Regex;

/// Canonical display name of a stop plus whether it names a station or hub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopName {
    /// Name as displayed.
    pub name: String,
    /// Station or hub stop.
    pub is_major: bool,
}

fn pass_stop_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\((경유|가상)\)$").expect("pass-stop pattern is valid"))
}

fn center_lane_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(중\)$").expect("center-lane pattern is valid"))
}

fn station_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // optional line prefix, the station itself, optional line/hub suffix, optional exit
        Regex::new(
            r"(?:(?:지하철)?[1-9]호선|신분당선|공항철도)?(.+역)(?:[1-9]호선|환승센터|환승센타)?(?:[0-9]+번(출구|승강장))?$",
        )
        .expect("station pattern is valid")
    })
}

fn station_qualifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(.+\)역").expect("qualifier pattern is valid"))
}

fn hub_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(광역환승센터|환승센터|환승센타|고속터미널|잠실종합운동장)$")
            .expect("hub pattern is valid")
    })
}

fn route_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9A-Za-z]+").expect("route number pattern is valid"))
}

fn route_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[가-힣]+|N|[^가-힣]+").expect("route run pattern is valid"))
}

/// Stops the vehicle passes without serving passengers.
pub fn is_pass_stop(raw: &str) -> bool {
    pass_stop_pattern().is_match(raw)
}

/// Split a stop name into its main part and a trailing pass-through marker.
pub fn split_pass_suffix(name: &str) -> (&str, &str) {
    match pass_stop_pattern().find(name) {
        Some(m) => name.split_at(m.start()),
        None => (name, ""),
    }
}

/// Canonicalize a raw agency stop name.
pub fn canonical_stop_name(raw: &str) -> StopName {
    // The only station name containing a period.
    if raw == "4.19민주묘지역" {
        return StopName {
            name: raw.to_string(),
            is_major: true,
        };
    }

    for part in raw.split('.') {
        if hub_pattern().is_match(part) {
            return StopName {
                name: part.replace("환승센타", "환승센터"),
                is_major: true,
            };
        }
        if let Some(caps) = station_pattern().captures(part) {
            let station = caps.get(1).map_or("", |m| m.as_str());
            return StopName {
                name: station_qualifier_pattern()
                    .replace_all(station, "역")
                    .into_owned(),
                is_major: true,
            };
        }
    }

    let name = match center_lane_pattern().find(raw) {
        Some(m) => &raw[..m.start()],
        None => raw,
    };
    StopName {
        name: name.to_string(),
        is_major: false,
    }
}

/// Split a route display name after its first alphanumeric run.
///
/// `"7016번"` becomes `("7016", "번")`; names without digits or latin letters
/// stay whole.
pub fn split_route_name(name: &str) -> (&str, &str) {
    match route_number_pattern().find(name) {
        Some(m) => name.split_at(m.end()),
        None => (name, ""),
    }
}

/// Typeface class of one run of a route number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteRunKind {
    /// Hangul syllables.
    Hangul,
    /// A lone night-route `N`.
    Night,
    /// Digits, latin letters and anything else.
    Other,
}

/// Break the main part of a route name into typeface runs.
pub fn route_name_runs(main: &str) -> Vec<(RouteRunKind, &str)> {
    route_run_pattern()
        .find_iter(main)
        .map(|m| {
            let text = m.as_str();
            let kind = if text == "N" {
                RouteRunKind::Night
            } else if text.chars().next().is_some_and(is_hangul_syllable) {
                RouteRunKind::Hangul
            } else {
                RouteRunKind::Other
            };
            (kind, text)
        })
        .collect()
}

fn is_hangul_syllable(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

#[cfg(test)]
#[path = "../../tests/unit/route/names.rs"]
mod tests;
