use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// What the shell hands back for a dataset request.
pub type FetchResult = crux_http::Result<crux_http::Response<Vec<u8>>>;

pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_RESPONSE_BODY_SIZE: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum HttpError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request failed: {message}")]
    Transport { message: String },

    #[error("HTTP error {status}")]
    HttpStatus { status: u16 },

    #[error("response body too large: {size} bytes exceeds maximum of {max} bytes")]
    ResponseTooLarge { size: usize, max: usize },

    #[error("response body is empty")]
    EmptyBody,
}

impl HttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl {
    url: String,
    scheme: String,
    host: String,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, HttpError> {
        let url = url.into();
        let parsed = Self::validate(&url)?;
        Self::from_parsed(&parsed)
    }

    /// Resolves `path` against `base`, the way a browser resolves a relative
    /// `fetch` against the page URL.
    pub fn join(base: &str, path: &str) -> Result<Self, HttpError> {
        let base = Self::validate(base)?;
        let joined = base.join(path).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(path),
            reason: e.to_string(),
        })?;
        Self::validate(joined.as_str())?;
        Self::from_parsed(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn from_parsed(parsed: &Url) -> Result<Self, HttpError> {
        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl {
                url: Self::truncate_url(parsed.as_str()),
                reason: "missing host".to_string(),
            })?
            .to_lowercase();

        Ok(Self {
            url: parsed.to_string(),
            scheme: parsed.scheme().to_lowercase(),
            host,
        })
    }

    fn validate(url: &str) -> Result<Url, HttpError> {
        if url.trim().is_empty() {
            return Err(HttpError::InvalidUrl {
                url: url.to_string(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("URL exceeds maximum length of {} bytes", MAX_URL_LENGTH),
            });
        }

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl {
            url: Self::truncate_url(url),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!(
                    "invalid scheme '{}', only 'http' and 'https' are allowed",
                    scheme
                ),
            });
        }

        if parsed.host_str().is_none() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "URL must have a host".to_string(),
            });
        }

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(HttpError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(parsed)
    }

    fn truncate_url(url: &str) -> String {
        if url.len() <= 100 {
            url.to_string()
        } else {
            let cut = (0..=100).rev().find(|i| url.is_char_boundary(*i)).unwrap_or(0);
            format!("{}...", &url[..cut])
        }
    }
}

/// Unwraps a shell response into the raw body, treating non-2xx statuses and
/// empty or oversized bodies as failures.
pub fn response_body(result: FetchResult) -> Result<Vec<u8>, HttpError> {
    let mut response = result.map_err(|e| HttpError::Transport {
        message: e.to_string(),
    })?;

    let status: u16 = response.status().into();
    if !(200..300).contains(&status) {
        return Err(HttpError::HttpStatus { status });
    }

    let body = response.take_body().unwrap_or_default();
    check_body(body)
}

pub(crate) fn check_body(body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
    if body.is_empty() {
        return Err(HttpError::EmptyBody);
    }
    if body.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(HttpError::ResponseTooLarge {
            size: body.len(),
            max: MAX_RESPONSE_BODY_SIZE,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        let url = ValidatedUrl::new("https://Maps.Example.com/data/address.json").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host(), "maps.example.com");
        assert!(ValidatedUrl::new("http://localhost:8080/address.json").is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(matches!(
            ValidatedUrl::new("ftp://files.example.com/address.json"),
            Err(HttpError::InvalidUrl { .. })
        ));
        assert!(ValidatedUrl::new("file:///tmp/address.json").is_err());
    }

    #[test]
    fn rejects_empty_and_relative() {
        assert!(ValidatedUrl::new("").is_err());
        assert!(ValidatedUrl::new("   ").is_err());
        assert!(ValidatedUrl::new("address.json").is_err());
    }

    #[test]
    fn rejects_credentials() {
        assert!(ValidatedUrl::new("https://user:pw@example.com/address.json").is_err());
    }

    #[test]
    fn join_resolves_relative_path() {
        let url = ValidatedUrl::join("https://example.com/app/", "address.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/address.json");

        let url = ValidatedUrl::join("https://example.com/app/index.html", "address.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/app/address.json");
    }

    #[test]
    fn join_keeps_absolute_path() {
        let url =
            ValidatedUrl::join("https://example.com/app/", "https://cdn.example.org/a.json").unwrap();
        assert_eq!(url.host(), "cdn.example.org");
    }

    #[test]
    fn long_urls_are_truncated_in_errors() {
        let long = format!("ftp://example.com/{}", "a".repeat(300));
        match ValidatedUrl::new(long) {
            Err(HttpError::InvalidUrl { url, .. }) => assert!(url.len() <= 103),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn body_checks() {
        assert_eq!(check_body(Vec::new()), Err(HttpError::EmptyBody));
        assert_eq!(check_body(b"[]".to_vec()), Ok(b"[]".to_vec()));
    }

    #[test]
    fn status_accessor() {
        assert_eq!(HttpError::HttpStatus { status: 404 }.status(), Some(404));
        assert_eq!(HttpError::EmptyBody.status(), None);
    }
}
