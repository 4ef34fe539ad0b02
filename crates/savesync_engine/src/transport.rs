//! Scripted transport for tests and examples.

use crate::http::{HttpClient, HttpResponse};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// A request seen by [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Target URL.
    pub url: String,
    /// Raw body.
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body as text.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A mock HTTP client for testing.
///
/// Answers with queued responses in order and records every request. An
/// empty queue answers with a transport failure.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Mutex<Option<Duration>>,
}

impl MockClient {
    /// Creates a mock client with no queued responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `200 OK` response with `body`.
    pub fn push_ok(&self, body: impl Into<Vec<u8>>) {
        self.responses.lock().push_back(Ok(HttpResponse::ok(body)));
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Queues a connection-level failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Err(message.into()));
    }

    /// Delays every response by `delay`.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Returns all requests seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }
}

impl HttpClient for MockClient {
    fn post(&self, url: &str, body: Vec<u8>) -> Result<HttpResponse, String> {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            body,
        });

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err("no mock response queued".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_answers_in_order() {
        let client = MockClient::new();
        client.push_ok("NULL");
        client.push_failure("connection reset");
        client.push_response(HttpResponse::new(500, "oops"));

        assert_eq!(client.post("u1", b"a".to_vec()).unwrap().body, b"NULL");
        assert_eq!(
            client.post("u2", b"b".to_vec()),
            Err("connection reset".to_string())
        );
        assert_eq!(client.post("u3", Vec::new()).unwrap().status, 500);
        assert!(client.post("u4", Vec::new()).is_err());

        let requests = client.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[0].url, "u1");
        assert_eq!(requests[1].body_text(), "b");
        assert_eq!(client.last_request().unwrap().url, "u4");
    }
}
