use crate::foundation::core::GeoPosition;

/// Route metadata shown in the info badge and used for palette selection.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RouteInfo {
    /// Agency route-type code (see [`route_type_label`]).
    pub route_type: u32,
    /// Display name, e.g. `"N26"` or `"7016번"`.
    pub name: String,
    /// Name of the first terminus.
    pub start: String,
    /// Name of the last terminus.
    pub end: String,
}

impl RouteInfo {
    /// Night routes are named with a leading `N`.
    pub fn is_night(&self) -> bool {
        self.name.starts_with('N')
    }
}

/// One stop on the route, in canonical route order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BusStop {
    /// Agency stop identifier.
    pub id: String,
    /// Raw agency stop name.
    pub name: String,
    /// Stop location.
    pub pos: GeoPosition,
    /// Agency marker for the turnback stop.
    #[serde(default)]
    pub is_transfer: bool,
}

/// Service region implied by a route-type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Seoul city routes.
    Seoul,
    /// Gyeonggi province routes.
    Gyeonggi,
    /// Busan routes.
    Busan,
}

/// Region a route-type code belongs to.
pub fn route_region(route_type: u32) -> Region {
    match route_type {
        0..=10 => Region::Seoul,
        11..=60 => Region::Gyeonggi,
        _ => Region::Busan,
    }
}

/// Short agency label for a route-type code.
pub fn route_type_label(route_type: u32) -> Option<&'static str> {
    let label = match route_type {
        0 => "공용",
        1 => "공항",
        2 => "마을",
        3 => "간선",
        4 => "지선",
        5 => "순환",
        6 => "광역",
        7 => "인천",
        8 => "경기",
        9 => "폐지",
        10 => "투어",
        11 => "직행",
        12 => "좌석",
        13 => "일반",
        14 => "광역",
        15 => "따복",
        16 => "순환",
        21 => "농어촌직행",
        22 => "농어촌좌석",
        23 => "농어촌",
        30 => "마을",
        41 => "고속",
        42 => "시외좌석",
        43 => "시외일반",
        51 => "공항리무진",
        52 => "공항좌석",
        53 => "공항일반",
        61 => "일반",
        62 => "급행",
        63 => "좌석",
        64 => "심야",
        65 => "마을",
        _ => return None,
    };
    Some(label)
}

/// Line colors for one route: the primary stroke and its darker variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoutePalette {
    /// Primary line color.
    pub line: &'static str,
    /// Darker variant for the inbound casing and inbound stops.
    pub dark: &'static str,
}

impl RoutePalette {
    const fn new(line: &'static str, dark: &'static str) -> Self {
        Self { line, dark }
    }

    /// Palette for a route, keyed by its type code.
    pub fn for_route(route: &RouteInfo) -> Self {
        const AIRPORT: RoutePalette = RoutePalette::new("#aa9872", "#81704e");
        const RED: RoutePalette = RoutePalette::new("#c83737", "#782121");

        match route.route_type {
            1 | 51 => AIRPORT,
            // Seoul branch.
            2 | 4 => Self::new("#5bb025", "#44831c"),
            // Seoul circular.
            5 => Self::new("#f99d1c", "#b46c0f"),
            6 | 11 | 21 => {
                if route.name.starts_with('P') {
                    AIRPORT
                } else {
                    RED
                }
            }
            12 | 22 => Self::new("#0075c8", "#005693"),
            13 | 23 => Self::new("#248f6c", "#19654b"),
            30 => Self::new("#f2a900", "#b57c00"),
            // Metropolitan express.
            14 => Self::new("#00aad4", "#0088aa"),
            61 => Self::new("#3399ff", "#2770b7"),
            62 | 63 => Self::new("#f58220", "#b45708"),
            64 => Self::new("#aaaaaa", "#747474"),
            65 => Self::new("#6EBF46", "#559734"),
            // Seoul trunk and everything unlisted.
            _ => Self::new("#3d5bab", "#263c77"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/route/model.rs"]
mod tests;
