use crate::domain::entities::{CONTENT_TYPE, JSON_MIME, Method, Request};
use crate::domain::value_objects::{JsonBody, Url};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::str::FromStr;

/// Builds the request for the one-shot `get` and `post` commands
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    url: Option<Url>,
    headers: HashMap<String, String>,
    body: Option<JsonBody>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: &str) -> Result<Self> {
        self.method = Some(Method::from_str(method)?);
        Ok(self)
    }

    pub fn url(mut self, raw_url: &str) -> Result<Self> {
        self.url = Some(Url::new(raw_url)?);
        Ok(self)
    }

    /// Adds `Name: Value` headers; entries without a colon are skipped
    pub fn headers(mut self, raw_headers: &[String]) -> Self {
        for raw in raw_headers {
            match raw.split_once(':') {
                Some((name, value)) => {
                    self.headers
                        .insert(name.trim().to_string(), value.trim().to_string());
                }
                None => tracing::warn!(header = raw.as_str(), "ignoring header without ':'"),
            }
        }
        self
    }

    /// Attaches a JSON payload and the matching `Content-Type`
    pub fn json(mut self, json: &Option<String>) -> Result<Self> {
        if let Some(data) = json {
            self.body = Some(JsonBody::new(data)?);
        }
        self.headers
            .insert(CONTENT_TYPE.to_string(), JSON_MIME.to_string());
        Ok(self)
    }

    pub fn build(self) -> Result<Request> {
        Ok(Request {
            method: self.method.ok_or_else(|| anyhow!("Method is required"))?,
            url: self.url.ok_or_else(|| anyhow!("URL is required"))?,
            headers: self.headers.into_iter().collect(),
            body: self.body.map(JsonBody::into_inner),
        })
    }
}
