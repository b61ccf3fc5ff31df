//! HTTP transport used to talk to the board
//!
//! The upload phases only see the [`Transport`] trait. The production
//! implementation is [`HttpTransport`], built on `reqwest`; tests substitute
//! their own recording implementation.

pub mod http_client;
pub mod trace;

pub use http_client::*;
pub use trace::*;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use url::Url;

use crate::config::Credentials;

/// HTTP verbs the board protocol uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// A single request against the board
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Bytes>,
    pub content_type: Option<&'static str>,
    pub credentials: Option<Credentials>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            body: None,
            content_type: None,
            credentials: None,
        }
    }

    /// POST without a body, as used by the sync and reset endpoints
    pub fn post_empty(url: Url) -> Self {
        Self {
            method: Method::Post,
            url,
            body: None,
            content_type: None,
            credentials: None,
        }
    }

    pub fn post(url: Url, body: Bytes, content_type: &'static str) -> Self {
        Self {
            method: Method::Post,
            url,
            body: Some(body),
            content_type: Some(content_type),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// Status and fully read body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Connect,
    Timeout,
    Request,
    Body,
}

/// A request that did not produce a readable response
#[derive(Debug, Clone)]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransportErrorKind::Connect => write!(f, "connection failed: {}", self.message),
            TransportErrorKind::Timeout => write!(f, "request timed out: {}", self.message),
            TransportErrorKind::Request => write!(f, "request failed: {}", self.message),
            TransportErrorKind::Body => write!(f, "failed to read response: {}", self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Request/response capability the orchestrator depends on
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and read the whole response body.
    ///
    /// Lifecycle events are reported to `observer` as the request progresses.
    async fn execute(
        &self,
        request: HttpRequest,
        observer: Arc<dyn TransferObserver>,
    ) -> Result<HttpResponse, TransportError>;
}
