use crate::exception::{HandleHook, ReportHook};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::backtrace::Backtrace;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// An error raised while serving a request
///
/// Carries everything the exception handler needs: a human readable message,
/// the HTTP status, an optional machine readable code, the stack captured at
/// construction, and optional hooks that take over reporting or rendering.
///
/// Frames are captured eagerly but symbolized only when [`stack`](Self::stack)
/// is first read.
pub struct HttpException {
    message: String,
    status: StatusCode,
    code: Option<String>,
    backtrace: Backtrace,
    stack: OnceLock<String>,
    source: Option<Box<dyn Error + Send + Sync>>,
    report_hook: Option<Arc<dyn ReportHook>>,
    handle_hook: Option<Arc<dyn HandleHook>>,
}

impl HttpException {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: None,
            backtrace: Backtrace::force_capture(),
            stack: OnceLock::new(),
            source: None,
            report_hook: None,
            handle_hook: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::NOT_FOUND)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Replace the captured stack with preformatted text
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = OnceLock::from(stack.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_report_hook(mut self, hook: impl ReportHook + 'static) -> Self {
        self.report_hook = Some(Arc::new(hook));
        self
    }

    pub fn with_handle_hook(mut self, hook: impl HandleHook + 'static) -> Self {
        self.handle_hook = Some(Arc::new(hook));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn stack(&self) -> &str {
        self.stack.get_or_init(|| self.backtrace.to_string())
    }

    /// Whether the stack text has been produced yet
    pub(crate) fn is_stack_formatted(&self) -> bool {
        self.stack.get().is_some()
    }

    /// Display name: the code when present, otherwise the type name
    pub fn name(&self) -> &str {
        self.code.as_deref().unwrap_or("HttpException")
    }

    pub fn report_hook(&self) -> Option<&dyn ReportHook> {
        self.report_hook.as_deref()
    }

    pub fn handle_hook(&self) -> Option<&dyn HandleHook> {
        self.handle_hook.as_deref()
    }

    /// Messages of the source chain, outermost first
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut current = self.source();
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }
        causes
    }
}

impl fmt::Display for HttpException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for HttpException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpException")
            .field("message", &self.message)
            .field("status", &self.status)
            .field("code", &self.code)
            .field("source", &self.source)
            .field("report_hook", &self.report_hook.is_some())
            .field("handle_hook", &self.handle_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl Error for HttpException {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

impl From<anyhow::Error> for HttpException {
    fn from(err: anyhow::Error) -> Self {
        HttpException::internal(err.to_string()).with_source(err)
    }
}

/// Response extension carrying an exception up to [`ExceptionLayer`](super::ExceptionLayer)
#[derive(Debug, Clone)]
pub struct RaisedException(pub Arc<HttpException>);

impl IntoResponse for HttpException {
    /// Without an exception layer this is a bare status response; the layer
    /// replaces it with the rendered error.
    fn into_response(self) -> Response {
        let mut response = self.status.into_response();
        response
            .extensions_mut()
            .insert(RaisedException(Arc::new(self)));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct ConnectionRefused;

    #[test]
    fn test_defaults() {
        let error = HttpException::new("boom");
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.code(), None);
        assert_eq!(error.name(), "HttpException");
        assert!(!error.is_stack_formatted());
        assert!(!error.stack().is_empty());
        assert!(error.is_stack_formatted());
        assert!(error.report_hook().is_none());
        assert!(error.handle_hook().is_none());
    }

    #[test]
    fn test_builders() {
        let error = HttpException::bad_request("bad request").with_code("E_BAD_REQUEST");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), Some("E_BAD_REQUEST"));
        assert_eq!(error.name(), "E_BAD_REQUEST");
        assert_eq!(error.to_string(), "bad request");
    }

    #[test]
    fn test_source_chain() {
        let error = HttpException::internal("cannot load user").with_source(ConnectionRefused);
        assert_eq!(error.causes(), vec!["connection refused".to_string()]);
    }

    #[test]
    fn test_into_response_carries_exception() {
        let response = HttpException::not_found("missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let raised = response.extensions().get::<RaisedException>().unwrap();
        assert_eq!(raised.0.message(), "missing");
    }
}
