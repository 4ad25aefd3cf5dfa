use crate::error::{ProcessingError, Result};
use crate::utils::constants::{EPSG_ETRS89, EPSG_WGS84, MAX_SPAIN_ZONE, MIN_SPAIN_ZONE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A UTM zone in the range covering Spain (29N, 30N, 31N).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct UtmZone(u8);

impl UtmZone {
    pub const Z29: UtmZone = UtmZone(29);
    pub const Z30: UtmZone = UtmZone(30);
    pub const Z31: UtmZone = UtmZone(31);

    /// Validate a caller-supplied zone number.
    pub fn new(zone: i64) -> Result<Self> {
        if (MIN_SPAIN_ZONE as i64..=MAX_SPAIN_ZONE as i64).contains(&zone) {
            Ok(Self(zone as u8))
        } else {
            Err(ProcessingError::InvalidFixedZone(zone))
        }
    }

    /// Standard UTM zone for a longitude, clamped into 29..=31.
    ///
    /// Longitudes west of 18°W collapse to 29 and east of 6°E to 31.
    pub fn from_longitude(lon: f64) -> Self {
        let raw = ((lon + 180.0) / 6.0).floor() as i64 + 1;
        Self(raw.clamp(MIN_SPAIN_ZONE as i64, MAX_SPAIN_ZONE as i64) as u8)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// ETRS89 / UTM CRS code for this zone, e.g. `EPSG:25831`.
    pub fn epsg_code(&self) -> String {
        format!("EPSG:258{:02}", self.0)
    }
}

impl TryFrom<i64> for UtmZone {
    type Error = ProcessingError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UtmZone> for u8 {
    fn from(zone: UtmZone) -> Self {
        zone.0
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}N", self.0)
    }
}

/// Zone-selection policy for a conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Everything goes to ETRS89 / UTM 31N (EPSG:25831).
    #[default]
    #[serde(rename = "force_31n")]
    Force31N,
    /// Per-row zone from longitude, clamped to 29..=31.
    Auto,
    /// A single caller-supplied zone.
    Fixed,
}

impl ConversionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionMode::Force31N => "force_31n",
            ConversionMode::Auto => "auto",
            ConversionMode::Fixed => "fixed",
        }
    }
}

impl FromStr for ConversionMode {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "force_31n" => Ok(ConversionMode::Force31N),
            "auto" => Ok(ConversionMode::Auto),
            "fixed" => Ok(ConversionMode::Fixed),
            other => Err(ProcessingError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geodetic datum of the input latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputDatum {
    #[default]
    Etrs89,
    Wgs84,
}

impl InputDatum {
    pub fn epsg_code(&self) -> &'static str {
        match self {
            InputDatum::Etrs89 => EPSG_ETRS89,
            InputDatum::Wgs84 => EPSG_WGS84,
        }
    }
}

impl FromStr for InputDatum {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "etrs89" | "epsg:4258" => Ok(InputDatum::Etrs89),
            "wgs84" | "epsg:4326" => Ok(InputDatum::Wgs84),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Unsupported datum: '{}' (expected etrs89 or wgs84)",
                other
            ))),
        }
    }
}
