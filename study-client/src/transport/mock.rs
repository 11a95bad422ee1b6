//! Mock transport for testing.
//!
//! Allows queueing responses and capturing the final, prepared requests
//! (after the client has attached the bearer header and stripped multipart
//! Content-Type) for verification.

use super::{status_text, ApiRequest, ApiResponse, HttpTransport, TransportError};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Mock transport for testing.
///
/// Clones share state, so tests can keep a handle for assertions while the
/// client owns another.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<MockTransportInner>>,
}

#[derive(Debug, Default)]
struct MockTransportInner {
    requests: Vec<ApiRequest>,
    outcomes: VecDeque<Result<ApiResponse, TransportError>>,
}

impl MockTransport {
    /// Create a new mock transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response for the next `execute` call.
    pub fn queue_json<T: Serialize>(&self, status: u16, body: &T) {
        let body = serde_json::to_vec(body).expect("mock body must serialize");
        self.queue_bytes(status, body);
    }

    /// Queue a bodyless response.
    pub fn queue_status(&self, status: u16) {
        self.queue_bytes(status, Vec::new());
    }

    /// Queue a raw-bytes response (blob download).
    pub fn queue_bytes(&self, status: u16, body: Vec<u8>) {
        let mut inner = self.inner.lock().unwrap();
        inner.outcomes.push_back(Ok(ApiResponse {
            status,
            status_text: status_text(status).to_string(),
            body,
        }));
    }

    /// Queue a network failure for the next `execute` call.
    pub fn fail_next(&self, error: TransportError) {
        let mut inner = self.inner.lock().unwrap();
        inner.outcomes.push_back(Err(error));
    }

    /// All requests executed so far, in order.
    pub fn sent_requests(&self) -> Vec<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ApiRequest> {
        let inner = self.inner.lock().unwrap();
        inner.requests.last().cloned()
    }

    /// Number of requests executed so far.
    pub fn request_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.requests.len()
    }

    /// Clear recorded requests and queued responses.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockTransportInner::default();
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);
        inner
            .outcomes
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ReceiveFailed("mock queue empty".to_string())))
    }
}
