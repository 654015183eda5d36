//! Reload client injection for served HTML.
//!
//! Wraps every static response. For `text/html` responses the length header
//! is dropped (the body is about to grow) and the first body chunk gets the
//! reload client spliced in before its last `</body>`. If that chunk has no
//! closing body tag the response passes through untouched; later chunks are
//! never inspected. Everything else passes through as-is.

use crate::dev::reload::RELOAD_CLIENT_SCRIPT;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use memchr::memmem;
use tokio_stream::StreamExt;

const CLOSING_BODY: &[u8] = b"</body>";

/// Per-response injection state.
#[derive(Debug, Clone, Default)]
pub struct InjectorState {
    html: bool,
    attempted: bool,
    injected: bool,
}

impl InjectorState {
    /// Inspect (and, for HTML, rewrite) the response headers.
    pub fn from_headers(headers: &mut HeaderMap) -> Self {
        let html = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("text/html"));

        if html {
            headers.remove(header::CONTENT_LENGTH);
        }

        Self {
            html,
            ..Self::default()
        }
    }

    pub fn is_html(&self) -> bool {
        self.html
    }

    /// Whether the script has been spliced in.
    pub fn injected(&self) -> bool {
        self.injected
    }

    /// Pass one body chunk through, injecting on the first one if possible.
    pub fn write(&mut self, chunk: Bytes) -> Bytes {
        if !self.html || self.attempted || chunk.is_empty() {
            return chunk;
        }
        self.attempted = true;

        let Some(idx) = memmem::rfind(&chunk, CLOSING_BODY) else {
            return chunk;
        };

        let script = RELOAD_CLIENT_SCRIPT.as_bytes();
        let mut spliced = Vec::with_capacity(chunk.len() + script.len());
        spliced.extend_from_slice(&chunk[..idx]);
        spliced.extend_from_slice(script);
        spliced.extend_from_slice(&chunk[idx..]);

        self.injected = true;
        Bytes::from(spliced)
    }
}

/// Middleware that injects the reload client into HTML responses.
pub async fn inject_reload_client(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    let mut state = InjectorState::from_headers(&mut parts.headers);
    if !state.is_html() {
        return Response::from_parts(parts, body);
    }

    let stream = body
        .into_data_stream()
        .map(move |chunk| chunk.map(|bytes| state.write(bytes)));

    Response::from_parts(parts, Body::from_stream(stream))
}
