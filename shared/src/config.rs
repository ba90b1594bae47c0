use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{HttpError, ValidatedUrl};
use crate::model::Coordinate;
use crate::viewport::ZoomLevel;
use crate::{
    AppError, ErrorKind, DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DETAIL_ZOOM, FALLBACK_CENTER,
    FALLBACK_ZOOM, PLACEHOLDER_IMAGE_URL, TILE_ATTRIBUTION, TILE_URL_TEMPLATE,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid data source: {0}")]
    DataSource(#[from] HttpError),
    #[error("invalid {field} zoom {value}")]
    InvalidZoom { field: &'static str, value: f64 },
    #[error("tile URL template is missing the {0} placeholder")]
    TileTemplate(&'static str),
    #[error("placeholder image URL cannot be empty")]
    EmptyPlaceholder,
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: TILE_URL_TEMPLATE.into(),
            attribution: TILE_ATTRIBUTION.into(),
        }
    }
}

/// Everything a shell may override. Sent as a whole via `Event::Configure`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Page origin the data path is resolved against.
    pub base_url: String,
    pub data_path: String,
    pub tile_layer: TileLayer,
    pub default_center: Coordinate,
    pub default_zoom: ZoomLevel,
    pub detail_zoom: ZoomLevel,
    pub placeholder_image_url: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            data_path: DEFAULT_DATA_PATH.into(),
            tile_layer: TileLayer::default(),
            default_center: FALLBACK_CENTER,
            default_zoom: ZoomLevel::new(FALLBACK_ZOOM),
            detail_zoom: ZoomLevel::new(DETAIL_ZOOM),
            placeholder_image_url: PLACEHOLDER_IMAGE_URL.into(),
        }
    }
}

impl MapConfig {
    pub fn data_url(&self) -> Result<ValidatedUrl, ConfigError> {
        Ok(ValidatedUrl::join(&self.base_url, &self.data_path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data_url()?;

        for (field, zoom) in [("default", self.default_zoom), ("detail", self.detail_zoom)] {
            if !zoom.is_valid() {
                return Err(ConfigError::InvalidZoom {
                    field,
                    value: zoom.value(),
                });
            }
        }

        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.tile_layer.url_template.contains(placeholder) {
                return Err(ConfigError::TileTemplate(placeholder));
            }
        }

        if self.placeholder_image_url.trim().is_empty() {
            return Err(ConfigError::EmptyPlaceholder);
        }

        Ok(())
    }
}
