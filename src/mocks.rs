//! Mock implementations for testing.
//!
//! Provides a mock transport so the generation flow can be exercised without
//! network access: tests enqueue responses and inspect the requests that
//! were made.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::UpstreamError;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Mock HTTP transport backed by a queue of canned responses.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, UpstreamError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Creates an empty mock transport.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Enqueues a response to be returned by the next request.
    pub fn enqueue(&self, response: Result<HttpResponse, UpstreamError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Enqueues a JSON response with the given status and body.
    pub fn enqueue_json(&self, status: u16, body: &str) {
        self.enqueue(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Enqueues an upstream error.
    pub fn enqueue_error(&self, error: UpstreamError) {
        self.enqueue(Err(error));
    }

    /// Returns all requests made so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the most recent request, if any.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Asserts that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = self.requests.lock().unwrap().len();
        assert_eq!(actual, expected, "expected {expected} requests, got {actual}");
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, UpstreamError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(UpstreamError::Connection {
                    message: "no mock response enqueued".to_string(),
                })
            })
    }
}
