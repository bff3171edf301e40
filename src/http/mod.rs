//! Per-request HTTP context
//!
//! An [`HttpContext`] pairs a read-only view of the inbound request with the
//! response being built for it. Exactly one context exists per in-flight request.

mod request;
mod response;

pub use request::{REQUEST_ID_HEADER, RequestView};
pub use response::{ResponseBody, ResponseWriter};

use axum::http::{HeaderMap, Method, Uri, request::Parts};

#[derive(Debug)]
pub struct HttpContext {
    pub request: RequestView,
    pub response: ResponseWriter,
}

impl HttpContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            request: RequestView::new(method, uri, headers),
            response: ResponseWriter::new(),
        }
    }

    /// Build a context from the head of an axum request
    pub fn from_parts(parts: &Parts) -> Self {
        Self::new(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
        )
    }

    /// Assign a correlation id, used when the client did not send one
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request = self.request.with_id(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_from_parts() {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("/users?page=2")
            .header("accept", "text/html")
            .body(())
            .unwrap()
            .into_parts();

        let ctx = HttpContext::from_parts(&parts).with_request_id("req-1");
        assert_eq!(ctx.request.method(), Method::POST);
        assert_eq!(ctx.request.uri().path(), "/users");
        assert_eq!(ctx.request.header("accept"), Some("text/html"));
        assert_eq!(ctx.request.id(), Some("req-1"));
        assert!(!ctx.response.has_body());
    }
}
