use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::capabilities::{response_body, FetchResult, HttpError};
use crate::model::Location;
use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("dataset request failed: {0}")]
    Http(#[from] HttpError),
    #[error("dataset is not a JSON array of locations: {0}")]
    Decode(String),
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        let kind = match &e {
            LoadError::Http(HttpError::HttpStatus { status: 404 }) => ErrorKind::NotFound,
            LoadError::Http(HttpError::InvalidUrl { .. }) => ErrorKind::Configuration,
            LoadError::Http(_) => ErrorKind::Network,
            LoadError::Decode(_) => ErrorKind::Deserialization,
        };
        let mut error = AppError::new(kind, "Could not load the address list").with_internal(e.to_string());
        if let LoadError::Http(http) = &e {
            if let Some(status) = http.status() {
                error = error.with_context("status", status.to_string());
            }
        }
        error
    }
}

/// Decodes the whole file; a single malformed record fails the load.
#[instrument(level = "debug", skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_dataset(bytes: &[u8]) -> Result<Vec<Location>, LoadError> {
    let locations: Vec<Location> =
        serde_json::from_slice(bytes).map_err(|e| LoadError::Decode(e.to_string()))?;

    let mappable = locations.iter().filter(|l| l.is_mappable()).count();
    if mappable < locations.len() {
        debug!(
            skipped = locations.len() - mappable,
            "records without coordinates will not be displayed"
        );
    }
    info!(total = locations.len(), mappable, "dataset decoded");
    Ok(locations)
}

/// Shell response to decoded dataset.
pub fn load_from_response(result: FetchResult) -> Result<Vec<Location>, LoadError> {
    let body = response_body(result)?;
    parse_dataset(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_with_optional_fields() {
        let json = br#"[
            {"street": "Av. A", "city": "Lima", "province": "Lima", "postal_code": "15001",
             "country": "Peru", "latitude": -12.0, "longitude": -77.0,
             "image_url": "https://img.example.com/lima.jpg"},
            {"street": "Calle B", "city": "Quito", "latitude": null, "longitude": null}
        ]"#;

        let data = parse_dataset(json).unwrap();
        assert_eq!(data.len(), 2);
        assert!(data[0].is_mappable());
        assert!(!data[1].is_mappable());
        assert_eq!(data[1].country, None);
    }

    #[test]
    fn empty_array_is_a_valid_dataset() {
        assert_eq!(parse_dataset(b"[]").unwrap(), Vec::new());
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            parse_dataset(br#"{"street": "x"}"#),
            Err(LoadError::Decode(_))
        ));
        assert!(matches!(parse_dataset(b"not json"), Err(LoadError::Decode(_))));
    }

    #[test]
    fn rejects_wrongly_typed_coordinates() {
        assert!(parse_dataset(br#"[{"latitude": "-12.0", "longitude": -77.0}]"#).is_err());
    }

    #[test]
    fn error_kinds() {
        let not_found: AppError = LoadError::Http(HttpError::HttpStatus { status: 404 }).into();
        assert_eq!(not_found.kind, ErrorKind::NotFound);
        assert_eq!(not_found.context.get("status").map(String::as_str), Some("404"));

        let server: AppError = LoadError::Http(HttpError::HttpStatus { status: 503 }).into();
        assert_eq!(server.kind, ErrorKind::Network);

        let decode: AppError = LoadError::Decode("eof".into()).into();
        assert_eq!(decode.kind, ErrorKind::Deserialization);
        assert!(decode.internal_message.unwrap().contains("eof"));
    }
}
