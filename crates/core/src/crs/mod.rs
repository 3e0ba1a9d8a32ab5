//! Coordinate Reference System handling
//!
//! Every point set, zone partition and grid carries a [`CRS`]. Operations
//! that combine two of them call [`CRS::ensure_compatible`] first.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// EPSG codes of common geographic (longitude/latitude) systems.
const GEOGRAPHIC_EPSG: &[u32] = &[4326, 4258, 4269, 4277, 4283, 4617, 4674, 4979];

/// Whether coordinates are angles or planar lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrsKind {
    /// Longitude/latitude in degrees
    Geographic,
    /// Planar coordinates in linear units
    Projected,
}

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// WKT representation
    wkt: Option<String>,
    /// EPSG code if known
    epsg: Option<u32>,
    /// PROJ string if available
    proj: Option<String>,
    /// Declared kind; detected from the other fields when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<CrsKind>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            wkt: None,
            epsg: Some(code),
            proj: None,
            kind: None,
        }
    }

    /// A geographic (lon/lat) CRS by EPSG code, for codes not recognised
    /// by [`CRS::is_geographic`]
    pub fn geographic(code: u32) -> Self {
        Self {
            kind: Some(CrsKind::Geographic),
            ..Self::from_epsg(code)
        }
    }

    /// A projected CRS by EPSG code, declared explicitly
    pub fn projected(code: u32) -> Self {
        Self {
            kind: Some(CrsKind::Projected),
            ..Self::from_epsg(code)
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            wkt: Some(wkt.into()),
            epsg: None,
            proj: None,
            kind: None,
        }
    }

    /// Create a CRS from a PROJ string
    pub fn from_proj(proj: impl Into<String>) -> Self {
        Self {
            wkt: None,
            epsg: None,
            proj: Some(proj.into()),
            kind: None,
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// British National Grid (EPSG:27700), metres
    pub fn british_national_grid() -> Self {
        Self::from_epsg(27700)
    }

    /// Get EPSG code if known
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// Get WKT representation
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Get PROJ string
    pub fn proj(&self) -> Option<&str> {
        self.proj.as_deref()
    }

    /// Declared kind, or the kind detected from the EPSG code, WKT or PROJ
    /// string.
    ///
    /// Detection knows a short list of geographic EPSG codes (WGS 84,
    /// ETRS89, NAD83, NAD27, GDA94 and a few more), a `GEOGCS`/`GEOGCRS` WKT
    /// root and a `+proj=longlat` PROJ string. Any other EPSG code counts as
    /// projected: build other lon/lat systems with [`CRS::geographic`].
    pub fn kind(&self) -> CrsKind {
        if let Some(kind) = self.kind {
            return kind;
        }
        let geographic = if let Some(code) = self.epsg {
            GEOGRAPHIC_EPSG.contains(&code)
        } else if let Some(wkt) = &self.wkt {
            let head = wkt.trim_start().to_ascii_uppercase();
            head.starts_with("GEOGCS") || head.starts_with("GEOGCRS")
        } else if let Some(proj) = &self.proj {
            proj.contains("+proj=longlat") || proj.contains("+proj=latlong")
        } else {
            false
        };
        if geographic { CrsKind::Geographic } else { CrsKind::Projected }
    }

    /// Whether coordinates are longitude/latitude degrees; see [`CRS::kind`]
    pub fn is_geographic(&self) -> bool {
        self.kind() == CrsKind::Geographic
    }

    /// Check if two CRS are equivalent
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.proj, &other.proj) {
            return a == b;
        }
        false
    }

    /// Fail with [`Error::IncompatibleExtent`] unless `other` is equivalent
    pub fn ensure_compatible(&self, other: &CRS) -> Result<()> {
        if self.is_equivalent(other) {
            Ok(())
        } else {
            Err(Error::IncompatibleExtent {
                expected: self.identifier(),
                found: other.identifier(),
            })
        }
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(proj) = &self.proj {
            return proj.clone();
        }
        if let Some(wkt) = &self.wkt {
            let head: String = wkt.chars().take(50).collect();
            return format!("WKT:{}", head);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
