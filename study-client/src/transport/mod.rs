//! HTTP transport abstraction.
//!
//! This module provides a pluggable transport layer that abstracts the
//! underlying HTTP stack (reqwest in the app, mock in tests).
//!
//! # Design
//!
//! [`ApiClient`](crate::ApiClient) prepares an [`ApiRequest`] (bearer header,
//! multipart header stripping) and hands it to the transport, which performs
//! exactly one HTTP exchange. Classification of the response - retryable vs.
//! terminal, the 401 side effect - happens above the transport, in the
//! client.

mod http;
mod mock;

pub use http::ReqwestTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Transport-level failures - the request never produced a response.
///
/// These are the `network_error` cases in failure reports; any HTTP
/// response, whatever its status, is returned as an [`ApiResponse`] instead.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The client-side timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The request could not be sent.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// The response body could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The request itself was malformed (bad multipart part, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// The method name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One part of a multipart form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    /// Form field name.
    pub name: String,
    /// File name, for file parts.
    pub file_name: Option<String>,
    /// Content type of this part (not of the request).
    pub content_type: Option<String>,
    /// The part payload.
    pub data: Vec<u8>,
}

impl MultipartPart {
    /// A plain text form field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    /// A file field.
    pub fn file(name: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: None,
            data,
        }
    }
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON payload.
    Json(Value),
    /// URL-encoded form (the OAuth2 `/token` endpoint).
    Form(Vec<(String, String)>),
    /// Multipart form (document upload). The transport sets its own
    /// boundary-bearing Content-Type; the request must not carry one.
    Multipart(Vec<MultipartPart>),
}

impl RequestBody {
    /// Whether this is a multipart body.
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// A prepared API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Originating API name, used to tag error reports.
    pub api: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL, with ids already substituted.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Extra headers. `Authorization` is attached by the client, not here.
    pub headers: Vec<(String, String)>,
    /// The body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Create a request with no query, headers or body.
    pub fn new(api: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            api,
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(api: &'static str, path: impl Into<String>) -> Self {
        Self::new(api, Method::Get, path)
    }

    /// Shorthand for a POST request.
    pub fn post(api: &'static str, path: impl Into<String>) -> Self {
        Self::new(api, Method::Post, path)
    }

    /// Shorthand for a PUT request.
    pub fn put(api: &'static str, path: impl Into<String>) -> Self {
        Self::new(api, Method::Put, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(api: &'static str, path: impl Into<String>) -> Self {
        Self::new(api, Method::Delete, path)
    }

    /// Append query parameters.
    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Attach a URL-encoded form body.
    pub fn with_form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    /// Attach a multipart form body.
    pub fn with_multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Look up a header by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Numeric HTTP status.
    pub status: u16,
    /// Status reason phrase, when known.
    pub status_text: String,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport trait: perform one HTTP exchange.
///
/// Implementations must return `Ok` for every response the server produced,
/// whatever its status; `Err` is reserved for the no-response cases.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute the request and return the server's response.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Reason phrase for the statuses this API actually produces.
pub(crate) fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}
