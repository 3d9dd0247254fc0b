use crate::domain::entities::{Request, Response};
use anyhow::Result;
use async_trait::async_trait;

/// Trait for HTTP clients to enable mocking and dependency inversion
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}

/// Application service for orchestrating HTTP request workflows
/// This contains business logic and use cases
pub struct HttpRequestService {
    http_client: Box<dyn HttpClient>,
}

impl HttpRequestService {
    pub fn new(http_client: Box<dyn HttpClient>) -> Self {
        Self { http_client }
    }

    /// Validates and sends a single request; no retries
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        self.validate_request(&request)?;
        tracing::debug!(method = %request.method, url = request.url.as_str(), "dispatching request");
        self.http_client.send(request).await
    }

    fn validate_request(&self, request: &Request) -> Result<()> {
        RequestValidator::validate(request)
    }
}

/// Domain service for request validation
/// This contains domain business rules
pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(request: &Request) -> Result<()> {
        Self::validate_url(&request.url)
    }

    fn validate_url(url: &crate::domain::value_objects::Url) -> Result<()> {
        crate::domain::validators::validate_url(url.as_str())?;
        Ok(())
    }
}
