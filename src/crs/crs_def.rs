use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::error::{StoreError, StoreResult};

use super::crs_utils::{epsg_code_to_authority_string, EpsgCode};
use super::equal_area::EASE_GRID_MAX_LAT;
use super::utm_conversion::zone_central_meridian;
use super::web_mercator::WEB_MERCATOR_MAX_LAT;

/// Half width in degrees of the band around a UTM central meridian in which the zone is accepted.
/// Wider than the nominal 3° so regional data straddling a zone border can still be projected into
/// one zone, and narrow enough for the series to round trip within 1e-6°.
const UTM_HALF_WIDTH_DEG: f64 = 4.0;

/// Identifiers of geographic WGS 84 in longitude/latitude order.
const CRS84_IDENTIFIERS: [&str; 4] = [
    "CRS84",
    "OGC:CRS84",
    "URN:OGC:DEF:CRS:OGC:1.3:CRS84",
    "URN:OGC:DEF:CRS:OGC::CRS84",
];

/// Unit system of the coordinate values of a CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Angular degrees of longitude/latitude.
    Degrees,
    /// Linear meters.
    Meters,
    /// A CRS read from a file by code only.
    Unknown,
}

impl Units {
    pub fn is_angular(&self) -> bool {
        matches!(self, Units::Degrees)
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Units::Meters)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Units::Degrees => "degrees",
            Units::Meters => "meters",
            Units::Unknown => "unknown",
        }
    }
}

/// Geographic envelope, in degrees, within which a CRS is defined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaOfUse {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfUse {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.west..=self.east).contains(&lon) && (self.south..=self.north).contains(&lat)
    }
}

/// Coordinate reference system. Coordinates are always ordered (x, y), i.e. (lon, lat) for
/// geographic systems and (easting, northing) for projected ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// EPSG:4326, geographic WGS 84.
    Wgs84,
    /// EPSG:3857, WGS 84 / Pseudo-Mercator.
    WebMercator,
    /// EPSG:326xx (north) and EPSG:327xx (south), WGS 84 / UTM.
    Utm { zone: u8, south: bool },
    /// EPSG:6933, WGS 84 / NSIDC EASE-Grid 2.0 Global.
    EaseGrid2Global,
    /// A CRS outside the built-in catalogue, declared by the caller together with its units.
    Other { code: EpsgCode, units: Units },
}

impl Crs {
    pub fn from_epsg(code: EpsgCode) -> StoreResult<Self> {
        match code {
            4326 => Ok(Crs::Wgs84),
            3857 => Ok(Crs::WebMercator),
            6933 => Ok(Crs::EaseGrid2Global),
            32601..=32660 => Ok(Crs::Utm {
                zone: (code - 32600) as u8,
                south: false,
            }),
            32701..=32760 => Ok(Crs::Utm {
                zone: (code - 32700) as u8,
                south: true,
            }),
            _ => Err(StoreError::UnknownCrs(epsg_code_to_authority_string(code))),
        }
    }

    pub fn utm(zone: u8, south: bool) -> StoreResult<Self> {
        if !(1..=60).contains(&zone) {
            return Err(StoreError::UnknownCrs(format!("UTM zone {}", zone)));
        }
        Ok(Crs::Utm { zone, south })
    }

    /// Catalogue CRS for `code`, or a CRS with unknown units outside it.
    pub fn from_epsg_or_other(code: EpsgCode) -> Self {
        Crs::from_epsg(code).unwrap_or(Crs::Other {
            code,
            units: Units::Unknown,
        })
    }

    /// Declare a CRS the catalogue does not know. Its units drive the unit checks of `area` and
    /// `length`; transforming into or out of it needs the `proj` feature.
    pub fn other(code: EpsgCode, units: Units) -> Self {
        Crs::Other { code, units }
    }

    /// Declare the units of a CRS outside the catalogue. Catalogue CRSs keep their own units.
    pub fn with_units(self, units: Units) -> Self {
        match self {
            Crs::Other { code, .. } => Crs::Other { code, units },
            builtin => builtin,
        }
    }

    pub fn epsg_code(&self) -> EpsgCode {
        match self {
            Crs::Wgs84 => 4326,
            Crs::WebMercator => 3857,
            Crs::EaseGrid2Global => 6933,
            Crs::Utm { zone, south } => (if *south { 32700 } else { 32600 }) + *zone as EpsgCode,
            Crs::Other { code, .. } => *code,
        }
    }

    /// Authority string, e.g. "EPSG:4326".
    pub fn authority(&self) -> String {
        epsg_code_to_authority_string(self.epsg_code())
    }

    /// OGC URN as written into the legacy GeoJSON `crs` member. Geographic WGS 84 is written as
    /// CRS84, since EPSG:4326 is defined in latitude/longitude order.
    pub fn ogc_urn(&self) -> String {
        match self {
            Crs::Wgs84 => "urn:ogc:def:crs:OGC:1.3:CRS84".to_string(),
            _ => format!("urn:ogc:def:crs:EPSG::{}", self.epsg_code()),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Crs::Wgs84 => "WGS 84".to_string(),
            Crs::WebMercator => "WGS 84 / Pseudo-Mercator".to_string(),
            Crs::EaseGrid2Global => "WGS 84 / NSIDC EASE-Grid 2.0 Global".to_string(),
            Crs::Utm { zone, south } => {
                format!("WGS 84 / UTM zone {}{}", zone, if *south { "S" } else { "N" })
            }
            Crs::Other { code, .. } => epsg_code_to_authority_string(*code),
        }
    }

    pub fn units(&self) -> Units {
        match self {
            Crs::Wgs84 => Units::Degrees,
            Crs::WebMercator | Crs::Utm { .. } | Crs::EaseGrid2Global => Units::Meters,
            Crs::Other { units, .. } => *units,
        }
    }

    pub fn is_geographic(&self) -> bool {
        self.units().is_angular()
    }

    pub fn is_projected(&self) -> bool {
        self.units().is_linear()
    }

    /// Envelope in which coordinates may be transformed into this CRS. Unknown for `Other`.
    pub fn area_of_use(&self) -> Option<AreaOfUse> {
        match self {
            Crs::Wgs84 => Some(AreaOfUse {
                west: -180.0,
                south: -90.0,
                east: 180.0,
                north: 90.0,
            }),
            Crs::WebMercator => Some(AreaOfUse {
                west: -180.0,
                south: -WEB_MERCATOR_MAX_LAT,
                east: 180.0,
                north: WEB_MERCATOR_MAX_LAT,
            }),
            Crs::EaseGrid2Global => Some(AreaOfUse {
                west: -180.0,
                south: -EASE_GRID_MAX_LAT,
                east: 180.0,
                north: EASE_GRID_MAX_LAT,
            }),
            Crs::Utm { zone, south } => {
                let lon0 = zone_central_meridian(*zone);
                // Each zone only covers its own hemisphere.
                let (south_lat, north_lat) = if *south { (-80.0, 0.0) } else { (0.0, 84.0) };
                Some(AreaOfUse {
                    west: lon0 - UTM_HALF_WIDTH_DEG,
                    south: south_lat,
                    east: lon0 + UTM_HALF_WIDTH_DEG,
                    north: north_lat,
                })
            }
            Crs::Other { .. } => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Crs::Other { .. })
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Other { .. } => write!(f, "{}", self.authority()),
            _ => write!(f, "{} ({})", self.authority(), self.name()),
        }
    }
}

/// Parses "EPSG:n", OGC URNs ("urn:ogc:def:crs:EPSG::n", "urn:ogc:def:crs:OGC:1.3:CRS84") and
/// OGC definition URLs ("http://www.opengis.net/def/crs/EPSG/0/n"). EPSG codes outside the
/// catalogue give a `Crs::Other` with unknown units.
impl FromStr for Crs {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let identifier = s.trim();
        let unknown = || StoreError::UnknownCrs(identifier.to_string());
        let upper = identifier.to_ascii_uppercase();
        let is_crs84_url = upper
            .trim_end_matches('/')
            .strip_suffix("/CRS84")
            .map_or(false, |prefix| prefix.contains("OPENGIS.NET/DEF/CRS/OGC/"));
        if CRS84_IDENTIFIERS.contains(&upper.as_str()) || is_crs84_url {
            return Ok(Crs::Wgs84);
        }

        let code = if let Some(code) = upper.strip_prefix("EPSG:") {
            code
        } else if upper.starts_with("URN:OGC:DEF:CRS:EPSG:") {
            // The version segment between the authority and the code may be empty.
            upper.rsplit(':').next().ok_or_else(unknown)?
        } else if upper.contains("OPENGIS.NET/DEF/CRS/EPSG/") {
            upper.trim_end_matches('/').rsplit('/').next().ok_or_else(unknown)?
        } else {
            return Err(unknown());
        };
        let code: EpsgCode = code.trim().parse().map_err(|_| unknown())?;
        Ok(Crs::from_epsg_or_other(code))
    }
}

/// Whether a collection knows what its coordinates mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrsState {
    #[default]
    Undefined,
    Assigned(Crs),
}

impl CrsState {
    pub fn crs(&self) -> Option<Crs> {
        match self {
            CrsState::Undefined => None,
            CrsState::Assigned(crs) => Some(*crs),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, CrsState::Undefined)
    }
}

impl From<Crs> for CrsState {
    fn from(crs: Crs) -> Self {
        CrsState::Assigned(crs)
    }
}

impl From<Option<Crs>> for CrsState {
    fn from(crs: Option<Crs>) -> Self {
        crs.map_or(CrsState::Undefined, CrsState::Assigned)
    }
}

impl fmt::Display for CrsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsState::Undefined => write!(f, "undefined"),
            CrsState::Assigned(crs) => write!(f, "{}", crs),
        }
    }
}
