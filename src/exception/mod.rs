//! Centralized HTTP exception handling
//!
//! Errors raised while serving a request flow through two independent steps:
//!
//! ```text
//! HttpException ──► ExceptionReporter ──► Logger      (should it be logged, and how?)
//!               └─► ExceptionResponder ──► HttpContext (what does the client see?)
//! ```
//!
//! The [`ExceptionHandler`] facade runs both, and [`ExceptionLayer`] wires the
//! facade into an axum router.
//!
//! # Example
//!
//! ```rust,ignore
//! use harbor::exception::{ExceptionHandler, ExceptionHandlerConfig, ExceptionLayer, HttpException};
//!
//! let config = ExceptionHandlerConfig::default()
//!     .ignore_code("E_VALIDATION_FAILURE")
//!     .ignore_status(404)
//!     .debug(true);
//! let handler = Arc::new(ExceptionHandler::new(config, Arc::new(TracingLogger)));
//!
//! async fn show() -> Result<String, HttpException> {
//!     Err(HttpException::not_found("user not found").with_code("E_USER_NOT_FOUND"))
//! }
//!
//! let app = Router::new()
//!     .route("/users/{id}", get(show))
//!     .layer(ExceptionLayer::new(handler));
//! ```

mod config;
mod handler;
mod http;
mod layer;
mod reporter;
mod responder;
mod trace;

pub use config::ExceptionHandlerConfig;
pub use handler::ExceptionHandler;
pub use http::{HttpException, RaisedException};
pub use layer::{ExceptionLayer, ExceptionMiddleware};
pub use reporter::ExceptionReporter;
pub use responder::ExceptionResponder;
pub use trace::{StackFrame, TracePage};

use crate::error::Result;
use crate::http::{HttpContext, ResponseBody};
use crate::logger::{LogFields, Logger};
use async_trait::async_trait;
use std::sync::Arc;

/// Error-owned logging
///
/// An exception carrying a report hook takes over log formatting entirely;
/// the default log entry is not written.
pub trait ReportHook: Send + Sync {
    fn report(&self, error: &HttpException, logger: &dyn Logger, ctx: &HttpContext) -> Result<()>;
}

impl<F> ReportHook for F
where
    F: Fn(&HttpException, &dyn Logger, &HttpContext) -> Result<()> + Send + Sync,
{
    fn report(&self, error: &HttpException, logger: &dyn Logger, ctx: &HttpContext) -> Result<()> {
        self(error, logger, ctx)
    }
}

/// Error-owned rendering
///
/// The returned body is handed back verbatim. The hook owns the status and
/// body; the default renderer is skipped.
#[async_trait]
pub trait HandleHook: Send + Sync {
    async fn handle(
        &self,
        error: &HttpException,
        ctx: &mut HttpContext,
    ) -> anyhow::Result<ResponseBody>;
}

/// Extra fields merged into every default log entry
pub type ContextHook = Arc<dyn Fn(&HttpContext) -> LogFields + Send + Sync>;
