//! # Harbor
//!
//! Centralized HTTP exception handling and route tree utilities for axum
//! applications.
//!
//! ## Features
//!
//! - **Exception reporting**: ignore lists by code or status, error-owned report
//!   hooks, and structured log entries enriched with request context
//! - **Exception rendering**: content negotiation between JSON, JSON:API and HTML,
//!   with stack traces and an interactive trace page in development mode
//! - **Tower integration**: return `Result<_, HttpException>` from handlers and let
//!   [`ExceptionLayer`] report and render the failure
//! - **Route trees**: plain routes, groups and resources flattened into the
//!   ordered list a route table registers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use harbor::prelude::*;
//! use axum::routing::get;
//!
//! async fn show_user(Path(id): Path<u32>) -> std::result::Result<String, HttpException> {
//!     if id == 0 {
//!         return Err(HttpException::bad_request("invalid id").with_code("E_INVALID_ID"));
//!     }
//!     Ok(format!("user {}", id))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ConfigService::new();
//!     let handler = Arc::new(ExceptionHandler::from_config(&config));
//!
//!     let app: Router = Router::new()
//!         .route("/users/{id}", get(show_user))
//!         .layer(ExceptionLayer::new(handler));
//!
//!     // Serve your app...
//! }
//! ```

pub mod config;
pub mod error;
pub mod exception;
pub mod http;
pub mod logger;
pub mod routing;

// Re-export core types
pub use config::{AppEnvironment, ConfigService};
pub use error::{HarborError, Result};
pub use exception::{
    ExceptionHandler, ExceptionHandlerConfig, ExceptionLayer, ExceptionReporter,
    ExceptionResponder, HttpException,
};
pub use http::{HttpContext, ResponseBody};
pub use logger::{Logger, MemoryLogger, Severity, TracingLogger};
pub use routing::{Route, RouteGroup, RouteNode, RouteResource, flatten};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use harbor::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AppEnvironment, ConfigService};
    pub use crate::error::{HarborError, Result};
    pub use crate::exception::{
        ContextHook, ExceptionHandler, ExceptionHandlerConfig, ExceptionLayer, HandleHook,
        HttpException, ReportHook, TracePage,
    };
    pub use crate::http::{HttpContext, ResponseBody};
    pub use crate::logger::{LogFields, Logger, MemoryLogger, Severity, TracingLogger};
    pub use crate::routing::{
        BriskRoute, ResourceAction, Route, RouteGroup, RouteNode, RouteResource, flatten,
    };
    pub use async_trait::async_trait;
    pub use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
