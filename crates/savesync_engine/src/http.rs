//! HTTP transport abstraction.
//!
//! The session only needs "POST these bytes to this URL and give me the
//! status and body". The trait keeps the HTTP library swappable, and the
//! loopback client routes requests to an in-process server for tests.

/// Response to a POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` response.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// `post` blocks until the exchange finishes; the session calls it from a
/// blocking worker. `Err` carries a connection-level failure message.
pub trait HttpClient: Send + Sync {
    /// Sends a form-encoded POST request.
    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for std::sync::Arc<C> {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        (**self).post(url, body)
    }
}

/// Trait for servers that can handle loopback requests.
pub trait LoopbackServer {
    /// Handles a POST to `path` and returns the response.
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<HttpResponse, String>;
}

impl<S: LoopbackServer + ?Sized> LoopbackServer for std::sync::Arc<S> {
    fn handle_post(&self, path: &str, body: &[u8]) -> Result<HttpResponse, String> {
        (**self).handle_post(path, body)
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing without actual network overhead.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer + Send + Sync> LoopbackClient<S> {
    /// Creates a new loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }
}

impl<S: LoopbackServer + Send + Sync> HttpClient for LoopbackClient<S> {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        self.server.handle_post(request_path(url), &body)
    }
}

/// Returns the path part of `url`, or `url` itself if it has no scheme.
pub fn request_path(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    let rest = &url[scheme_end + 3..];
    rest.find('/').map_or("/", |i| &rest[i..])
}

#[cfg(feature = "http")]
pub use reqwest_client::ReqwestClient;

#[cfg(feature = "http")]
mod reqwest_client {
    use super::{HttpClient, HttpResponse};
    use crate::error::{SyncError, SyncResult};
    use std::time::Duration;
    use tokio::runtime::Handle;

    const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// [`HttpClient`] backed by an async `reqwest` client.
    ///
    /// `post` drives the request on `runtime`, so it must be called from a
    /// blocking worker rather than an async task.
    pub struct ReqwestClient {
        client: reqwest::Client,
        runtime: Handle,
    }

    impl ReqwestClient {
        /// Creates a client with the given per-request timeout.
        pub fn new(runtime: Handle, timeout: Duration) -> SyncResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| SyncError::config(format!("http client: {e}")))?;
            Ok(Self { client, runtime })
        }
    }

    impl HttpClient for ReqwestClient {
        fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
            self.runtime.block_on(async {
                let response = self
                    .client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(body)
                    .send()
                    .await
                    .map_err(|e| e.to_string())?;
                let status = response.status().as_u16();
                let body = response.bytes().await.map_err(|e| e.to_string())?;
                Ok(HttpResponse::new(status, body.to_vec()))
            })
        }
    }
}
