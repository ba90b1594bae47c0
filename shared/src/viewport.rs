use serde::{Deserialize, Serialize};

use crate::model::Coordinate;
use crate::{MAX_ZOOM, MIN_ZOOM};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoomLevel {
    value: f64,
}

impl ZoomLevel {
    /// Clamps into the supported range; NaN falls back to the minimum.
    #[must_use]
    pub fn new(value: f64) -> Self {
        let value = if value.is_nan() { MIN_ZOOM } else { value };
        Self {
            value: value.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Strict variant for configuration input.
    #[must_use]
    pub fn checked(value: f64) -> Option<Self> {
        (value.is_finite() && (MIN_ZOOM..=MAX_ZOOM).contains(&value)).then_some(Self { value })
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        Self::checked(self.value).is_some()
    }
}

/// Axis-aligned lat/lon box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    #[must_use]
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Minimal box covering every coordinate, `None` for an empty input.
    pub fn from_coordinates<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::from_point(first), Self::extend))
    }

    #[must_use]
    pub fn extend(self, point: Coordinate) -> Self {
        let south = self.south_west.lat().min(point.lat());
        let west = self.south_west.lon().min(point.lon());
        let north = self.north_east.lat().max(point.lat());
        let east = self.north_east.lon().max(point.lon());

        // Min/max of in-range values stay in range.
        Self {
            south_west: Coordinate::new(south, west).unwrap_or(self.south_west),
            north_east: Coordinate::new(north, east).unwrap_or(self.north_east),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Coordinate) -> bool {
        (self.south_west.lat()..=self.north_east.lat()).contains(&point.lat())
            && (self.south_west.lon()..=self.north_east.lon()).contains(&point.lon())
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        let lat = (self.south_west.lat() + self.north_east.lat()) / 2.0;
        let lon = (self.south_west.lon() + self.north_east.lon()) / 2.0;
        Coordinate::new(lat, lon).unwrap_or(self.south_west)
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        self.south_west == self.north_east
    }
}

/// What the shell's map should show. A fitted viewport leaves the concrete
/// zoom to the shell, which knows the canvas size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: Coordinate, zoom: ZoomLevel },
    Fitted { bounds: Bounds },
}

impl Viewport {
    #[must_use]
    pub const fn centered(center: Coordinate, zoom: ZoomLevel) -> Self {
        Self::Centered { center, zoom }
    }

    #[must_use]
    pub fn center(&self) -> Coordinate {
        match self {
            Self::Centered { center, .. } => *center,
            Self::Fitted { bounds } => bounds.center(),
        }
    }

    #[must_use]
    pub const fn zoom(&self) -> Option<ZoomLevel> {
        match self {
            Self::Centered { zoom, .. } => Some(*zoom),
            Self::Fitted { .. } => None,
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Centered { .. } => None,
            Self::Fitted { bounds } => Some(*bounds),
        }
    }
}
