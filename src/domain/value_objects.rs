use anyhow::{Result, anyhow};
use hyper::http::Uri;
use serde_json::Value;
use thiserror::Error;

/// Reasons a URL is refused before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("URL cannot be empty")]
    Empty,
    #[error("URL must start with http:// or https://")]
    MissingScheme,
    #[error("Invalid URL: {0}")]
    Invalid(String),
}

/// Represents a validated URL
///
/// The text is kept exactly as entered; the parsed `Uri` is only produced on
/// demand when the transport needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(String);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL
    /// * `Err(UrlError)` - If the URL is empty, lacks an http(s) scheme or does not parse
    pub fn new(url: &str) -> Result<Self, UrlError> {
        crate::domain::validators::validate_url(url)?;
        url.parse::<Uri>()
            .map_err(|e| UrlError::Invalid(e.to_string()))?;
        Ok(Url(url.to_string()))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_uri(&self) -> Result<Uri> {
        self.0
            .parse::<Uri>()
            .map_err(|e| anyhow!("Invalid URL: {}", e))
    }
}

/// Represents a validated JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody(pub String);

impl JsonBody {
    /// Creates a new JsonBody with validation
    ///
    /// # Arguments
    /// * `json` - The JSON string to validate
    ///
    /// # Returns
    /// * `Ok(JsonBody)` - Validated JSON
    /// * `Err(anyhow::Error)` - If the JSON is invalid
    pub fn new(json: &str) -> Result<Self> {
        serde_json::from_str::<Value>(json)
            .map_err(|e| anyhow!("Invalid JSON: {}", e))?;
        Ok(JsonBody(json.to_string()))
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
