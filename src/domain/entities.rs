use crate::domain::value_objects::Url;
use anyhow::{Result, anyhow};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const ACCEPT: &str = "Accept";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_MIME: &str = "application/json";
pub const FORM_MIME: &str = "application/x-www-form-urlencoded";

/// HTTP methods offered by the builder, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Head,
        Method::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Methods for which the builder offers a body stage
    pub fn accepts_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| anyhow!("Unsupported HTTP method: '{}'", s))
    }
}

/// How the body text was produced and which `Content-Type` it implies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[default]
    None,
    Json,
    Form,
    Raw,
}

impl BodyFormat {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyFormat::Json => Some(JSON_MIME),
            BodyFormat::Form => Some(FORM_MIME),
            BodyFormat::None | BodyFormat::Raw => None,
        }
    }
}

/// The request model the interactive builder fills in stage by stage
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub url: String,
    pub method: Method,
    pub headers: HashMap<String, String>,
    pub query_params: BTreeMap<String, String>,
    pub body: String,
    pub body_format: BodyFormat,
    pub pretty_output: bool,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            url: String::new(),
            method: Method::Get,
            headers: HashMap::new(),
            query_params: BTreeMap::new(),
            body: String::new(),
            body_format: BodyFormat::None,
            pretty_output: true,
        }
    }
}

impl RequestDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `Accept: application/json` unless some `Accept` value is already set
    pub fn ensure_accept(&mut self) {
        self.headers
            .entry(ACCEPT.to_string())
            .or_insert_with(|| JSON_MIME.to_string());
    }

    /// Records the body format and the `Content-Type` it implies
    pub fn set_body_format(&mut self, format: BodyFormat) {
        self.body_format = format;
        if let Some(content_type) = format.content_type() {
            self.headers
                .insert(CONTENT_TYPE.to_string(), content_type.to_string());
        }
    }

    /// Base URL with the encoded query parameters appended
    pub fn send_url(&self) -> String {
        if self.query_params.is_empty() {
            return self.url.clone();
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params.iter())
            .finish();
        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{}{}", self.url, separator, query)
    }

    /// Freezes the draft into a transport-ready request
    pub fn to_request(&self) -> Result<Request> {
        let url = Url::new(&self.send_url())?;
        let body = (!self.body.is_empty()).then(|| self.body.clone());

        Ok(Request {
            method: self.method,
            url,
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body,
        })
    }
}

/// Represents an HTTP request
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>, // Key-value pairs for headers
    pub body: Option<String>,
}

/// Represents an HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    /// One entry per header value, in the order received
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Time from writing the request until the response head arrived
    pub elapsed: Duration,
}

/// Snapshot of a dispatched request as persisted to the history directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: String,
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub params: BTreeMap<String, String>,
    pub body: String,
}

impl HistoryRecord {
    pub fn from_draft(draft: &RequestDraft, timestamp: String) -> Self {
        Self {
            timestamp,
            method: draft.method,
            url: draft.url.clone(),
            headers: draft.headers.clone(),
            params: draft.query_params.clone(),
            body: draft.body.clone(),
        }
    }
}
