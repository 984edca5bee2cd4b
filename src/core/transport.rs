//! HTTP transport abstraction
//!
//! The client builds a fully-formed [`HttpRequest`] and hands it to a
//! [`Transport`]. The default [`HttpTransport`] sends it with reqwest; tests
//! swap in a recording transport.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failure to get any response from the remote end
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Outgoing request as assembled by the client
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Value of the first header named `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Value of the query parameter `key`
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response: HTTP status and body bytes
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns TransportError if the underlying HTTP client cannot be built
    /// (for example when no TLS backend is available).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req_builder = self
            .client
            .request(request.method, &request.url)
            .query(&request.query);

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {}", e)))?;

        debug!("Received HTTP {} ({} bytes)", status, body.len());

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording transport used by the client and resource tests

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses and records every request it receives
    #[derive(Default)]
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(&self, message: &str) -> &Self {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(TransportError(message.to_string())));
            self
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn last_request(&self) -> HttpRequest {
            self.requests
                .lock()
                .unwrap()
                .last()
                .cloned()
                .expect("no request was sent")
        }

        /// Body of the last request as UTF-8 text
        pub fn last_body(&self) -> String {
            String::from_utf8(self.last_request().body.expect("request had no body")).unwrap()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(HttpResponse::new(200, Vec::new())))
        }
    }

    /// Wraps `inner` in an `<api>` envelope with the given status code
    pub fn api_xml(inner: &str, status: &str) -> Vec<u8> {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<api>\n{}\n  <status><code>{}</code></status>\n</api>",
            inner, status
        )
        .into_bytes()
    }
}
