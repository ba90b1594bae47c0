use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::MapConfig;
use crate::view_state::ViewState;
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
}

impl From<CoordinateError> for AppError {
    fn from(e: CoordinateError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

/// Validated lat/lon. Zero on either axis is a real place, not a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// For compile-time constants only; values are not checked.
    pub(crate) const fn fixed(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    #[must_use]
    pub const fn lat(self) -> f64 {
        self.lat
    }

    #[must_use]
    pub const fn lon(self) -> f64 {
        self.lon
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lon)
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = CoordinateError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

/// Position of a record in the full dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub usize);

impl RecordId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One address entry as it appears in the input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Location {
    /// `None` when either axis is absent or not a usable coordinate.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        let (lat, lon) = (self.latitude?, self.longitude?);
        Coordinate::new(lat, lon).ok()
    }

    #[must_use]
    pub fn is_mappable(&self) -> bool {
        self.coordinate().is_some()
    }

    #[must_use]
    pub fn street(&self) -> &str {
        self.street.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn city(&self) -> &str {
        self.city.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn province(&self) -> &str {
        self.province.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn postal_code(&self) -> &str {
        self.postal_code.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn country(&self) -> &str {
        self.country.as_deref().unwrap_or_default()
    }

    /// Short label shared by the popup name line and the list entry.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.city(), self.street())
    }

    #[must_use]
    pub fn full_address(&self) -> String {
        [
            self.street(),
            self.city(),
            self.province(),
            self.postal_code(),
            self.country(),
        ]
        .join(", ")
    }

    #[must_use]
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => placeholder,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded {
        total: usize,
        mappable: usize,
    },
    Failed {
        error: AppError,
    },
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn has_started(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    pub config: MapConfig,
    pub load_state: LoadState,

    /// Full dataset; never mutated after load.
    pub dataset: Vec<Location>,
    pub filter_term: String,

    pub view: ViewState,
}

impl Model {
    #[must_use]
    pub fn new(config: MapConfig) -> Self {
        let view = ViewState::new(&config);
        Self {
            config,
            load_state: LoadState::Idle,
            dataset: Vec::new(),
            filter_term: String::new(),
            view,
        }
    }

    #[must_use]
    pub fn location(&self, id: RecordId) -> Option<&Location> {
        self.dataset.get(id.index())
    }

    #[must_use]
    pub fn mappable_count(&self) -> usize {
        self.dataset.iter().filter(|l| l.is_mappable()).count()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}
