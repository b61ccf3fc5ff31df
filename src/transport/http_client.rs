//! `reqwest` backed transport

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::{
    HttpRequest, HttpResponse, Method, TransferEvent, TransferObserver, Transport,
    TransportError, TransportErrorKind,
};
use crate::errors::{OtaError, Result};

/// Upload bodies are handed to the connection in pieces of this size
const BODY_CHUNK_SIZE: usize = 16 * 1024;

/// Production transport sharing one client, and so one timeout, for all phases
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// A zero `timeout` leaves requests without a deadline
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OtaError::RequestBuild(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: HttpRequest,
        observer: Arc<dyn TransferObserver>,
    ) -> std::result::Result<HttpResponse, TransportError> {
        log::debug!("{} {}", request.method, request.url);

        let lifecycle = Arc::new(Lifecycle::new(observer));
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
        };

        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(body) = request.body {
            log::debug!("Request body: {} bytes", body.len());
            builder = builder.header(CONTENT_LENGTH, body.len());
            builder = if body.is_empty() {
                builder.body(body)
            } else {
                builder.body(observed_body(body, lifecycle.clone()))
            };
        }

        lifecycle.emit(TransferEvent::ConnectStart);
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = TransportError::from(&e);
                lifecycle.failed(error.to_string());
                return Err(error);
            }
        };
        lifecycle.wrote_request();
        lifecycle.emit(TransferEvent::GotFirstResponseByte);

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            TransportError::new(TransportErrorKind::Body, e.to_string())
        })?;
        log::debug!("Response {} ({} bytes)", status, body.len());

        Ok(HttpResponse {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

impl From<&reqwest::Error> for TransportError {
    fn from(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Request
        };

        let message = match std::error::Error::source(err) {
            Some(source) => format!("{}: {}", err, source),
            None => err.to_string(),
        };
        TransportError::new(kind, message)
    }
}

/// Emits each lifecycle event at most once and in order.
///
/// The body stream is only polled once the connection is up and the request
/// head has been handed to it, so the first chunk marks both events.
struct Lifecycle {
    observer: Arc<dyn TransferObserver>,
    connected: AtomicBool,
    wrote_headers: AtomicBool,
    wrote_request: AtomicBool,
}

impl Lifecycle {
    fn new(observer: Arc<dyn TransferObserver>) -> Self {
        Self {
            observer,
            connected: AtomicBool::new(false),
            wrote_headers: AtomicBool::new(false),
            wrote_request: AtomicBool::new(false),
        }
    }

    fn emit(&self, event: TransferEvent) {
        self.observer.on_event(event);
    }

    fn connected(&self) {
        if !self.connected.swap(true, Ordering::SeqCst) {
            self.emit(TransferEvent::ConnectDone(Ok(())));
        }
    }

    fn wrote_headers(&self) {
        self.connected();
        if !self.wrote_headers.swap(true, Ordering::SeqCst) {
            self.emit(TransferEvent::WroteHeaders);
        }
    }

    fn wrote_request(&self) {
        self.wrote_headers();
        if !self.wrote_request.swap(true, Ordering::SeqCst) {
            self.emit(TransferEvent::WroteRequest);
        }
    }

    fn failed(&self, reason: String) {
        if !self.connected.swap(true, Ordering::SeqCst) {
            self.emit(TransferEvent::ConnectDone(Err(reason)));
        }
    }
}

fn observed_body(body: Bytes, lifecycle: Arc<Lifecycle>) -> reqwest::Body {
    let chunks: Vec<Bytes> = (0..body.len())
        .step_by(BODY_CHUNK_SIZE)
        .map(|start| body.slice(start..(start + BODY_CHUNK_SIZE).min(body.len())))
        .collect();
    let last = chunks.len().saturating_sub(1);

    let stream = futures_util::stream::iter(chunks.into_iter().enumerate()).map(
        move |(index, chunk)| {
            lifecycle.wrote_headers();
            if index == last {
                lifecycle.wrote_request();
            }
            Ok::<Bytes, std::io::Error>(chunk)
        },
    );

    reqwest::Body::wrap_stream(stream)
}
