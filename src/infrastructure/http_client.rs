use crate::application::services::{HttpClient, HttpRequestService};
use crate::domain::entities::{Method as DomainMethod, Request, Response};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::HOST;
use hyper::{Method, Request as HyperRequest, Uri};
use hyper_util::rt::TokioIo;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::time::timeout_at;
use tokio_native_tls::{TlsConnector, native_tls};

/// Infrastructure implementation of HttpClient using Hyper
/// This is a low-level HTTP transport that the application service uses
///
/// Each request opens its own HTTP/1.1 connection, wrapped in TLS for
/// `https` URLs. The whole exchange, body included, is bounded by `timeout`.
pub struct HyperHttpClient {
    tls: TlsConnector,
    timeout: Duration,
}

impl HyperHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let tls = native_tls::TlsConnector::new()
            .map_err(|e| anyhow!("Failed to initialise TLS: {}", e))?;
        Ok(Self {
            tls: TlsConnector::from(tls),
            timeout,
        })
    }

    /// Creates a configured HTTP request service using this client
    pub fn create_request_service(self) -> HttpRequestService {
        HttpRequestService::new(Box::new(self))
    }
}

#[async_trait]
impl HttpClient for HyperHttpClient {
    async fn send(&self, request: Request) -> Result<Response> {
        let uri = request.url.to_uri()?;
        let hyper_request = RequestAdapter::to_hyper_request(request, &uri)?;

        let started = Instant::now();
        // One deadline covers the head and the body read.
        let deadline = tokio::time::Instant::from_std(started) + self.timeout;
        let timed_out = || anyhow!("Request timed out after {:?}", self.timeout);

        let hyper_response =
            timeout_at(deadline, self.execute_http_request(&uri, hyper_request))
                .await
                .map_err(|_| timed_out())??;
        let elapsed = started.elapsed();

        tracing::debug!(status = %hyper_response.status(), ?elapsed, "response head received");
        timeout_at(deadline, ResponseAdapter::to_domain_response(hyper_response, elapsed))
            .await
            .map_err(|_| timed_out())?
    }
}

impl HyperHttpClient {
    async fn execute_http_request(
        &self,
        uri: &Uri,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>> {
        let target = Target::from_uri(uri)?;
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(|e| anyhow!("Connection to {}:{} failed: {}", target.host, target.port, e))?;

        if target.tls {
            let stream = self
                .tls
                .connect(&target.host, tcp)
                .await
                .map_err(|e| anyhow!("TLS handshake with {} failed: {}", target.host, e))?;
            Self::exchange(stream, request).await
        } else {
            Self::exchange(tcp, request).await
        }
    }

    async fn exchange<S>(
        stream: S,
        request: HyperRequest<Full<Bytes>>,
    ) -> Result<hyper::Response<Incoming>>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sender, connection) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| anyhow!("HTTP handshake failed: {}", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "connection closed with error");
            }
        });

        sender
            .send_request(request)
            .await
            .map_err(|e| anyhow!("HTTP request execution failed: {}", e))
    }
}

/// Where to open the connection for a URI
struct Target {
    host: String,
    port: u16,
    tls: bool,
}

impl Target {
    fn from_uri(uri: &Uri) -> Result<Self> {
        let tls = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            other => return Err(anyhow!("Unsupported URL scheme: {:?}", other)),
        };
        let host = uri
            .host()
            .ok_or_else(|| anyhow!("URL has no host: {}", uri))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = uri.port_u16().unwrap_or(if tls { 443 } else { 80 });

        Ok(Self { host, port, tls })
    }
}

/// Adapter for converting domain requests to Hyper requests
struct RequestAdapter;

impl RequestAdapter {
    fn to_hyper_request(domain_request: Request, uri: &Uri) -> Result<HyperRequest<Full<Bytes>>> {
        let method = MethodAdapter::to_hyper_method(domain_request.method);
        let body = BodyAdapter::to_hyper_body(domain_request.body);

        let mut builder = HyperRequest::builder()
            .method(method)
            .uri(UriAdapter::to_origin_form(uri));

        builder = HeaderAdapter::add_headers(builder, &domain_request.headers, uri);

        builder.body(body)
            .map_err(|e| anyhow!("Failed to build HTTP request: {}", e))
    }
}

/// Adapter for converting domain responses from Hyper responses
struct ResponseAdapter;

impl ResponseAdapter {
    async fn to_domain_response(
        hyper_response: hyper::Response<Incoming>,
        elapsed: Duration,
    ) -> Result<Response> {
        let status = hyper_response.status();
        let headers = hyper_response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = Self::extract_response_body(hyper_response).await?;

        Ok(Response {
            status,
            headers,
            body,
            elapsed,
        })
    }

    async fn extract_response_body(response: hyper::Response<Incoming>) -> Result<String> {
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?
            .to_bytes();

        Ok(String::from_utf8_lossy(&body_bytes).into_owned())
    }
}

/// Adapter for converting domain HTTP methods to Hyper methods
struct MethodAdapter;

impl MethodAdapter {
    fn to_hyper_method(domain_method: DomainMethod) -> Method {
        match domain_method {
            DomainMethod::Get => Method::GET,
            DomainMethod::Post => Method::POST,
            DomainMethod::Put => Method::PUT,
            DomainMethod::Patch => Method::PATCH,
            DomainMethod::Delete => Method::DELETE,
            DomainMethod::Head => Method::HEAD,
            DomainMethod::Options => Method::OPTIONS,
        }
    }
}

/// Adapter for the request-target sent on the wire
struct UriAdapter;

impl UriAdapter {
    fn to_origin_form(uri: &Uri) -> String {
        uri.path_and_query()
            .map(|pq| pq.as_str())
            .filter(|pq| !pq.is_empty())
            .unwrap_or("/")
            .to_string()
    }
}

/// Adapter for converting domain request bodies to Hyper bodies
struct BodyAdapter;

impl BodyAdapter {
    fn to_hyper_body(domain_body: Option<String>) -> Full<Bytes> {
        match domain_body {
            Some(body) => Full::new(Bytes::from(body)),
            None => Full::new(Bytes::new()),
        }
    }
}

/// Adapter for handling HTTP headers
struct HeaderAdapter;

impl HeaderAdapter {
    /// Applies the operator's headers, adding `Host` when they did not set one
    fn add_headers(
        mut builder: http::request::Builder,
        headers: &[(String, String)],
        uri: &Uri,
    ) -> http::request::Builder {
        let has_host = headers.iter().any(|(name, _)| name.eq_ignore_ascii_case("host"));
        if !has_host {
            if let Some(authority) = uri.authority() {
                builder = builder.header(HOST, authority.as_str());
            }
        }

        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }
}
