//! Interactive stack-trace page for development mode

use crate::exception::HttpException;
use crate::http::HttpContext;
use askama::Template;

/// Crates whose frames are hidden until "show all frames" is ticked
const INTERNAL_PREFIXES: &[&str] = &[
    "std::", "core::", "alloc::", "tokio::", "tower::", "axum::", "hyper::", "futures",
    "<std::", "<core::", "<alloc::", "<tokio::", "<tower::", "<axum::", "<hyper::",
    "__rust", "_start", "__libc",
];

/// One frame of a captured backtrace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    pub index: usize,
    pub symbol: String,
    pub location: Option<String>,
}

impl StackFrame {
    /// Parse the text form of `std::backtrace::Backtrace`.
    ///
    /// Frames look like `  3: my_app::handlers::show` optionally followed by
    /// an `at path/to/file.rs:10:5` line. Anything else is ignored, so a
    /// disabled or unsupported backtrace yields no frames.
    pub fn parse_all(stack: &str) -> Vec<StackFrame> {
        let mut frames: Vec<StackFrame> = Vec::new();

        for line in stack.lines().map(str::trim) {
            if let Some(location) = line.strip_prefix("at ") {
                if let Some(frame) = frames.last_mut() {
                    frame.location.get_or_insert_with(|| location.to_string());
                }
                continue;
            }

            let Some((index, symbol)) = line.split_once(": ") else {
                continue;
            };
            if let Ok(index) = index.parse::<usize>() {
                frames.push(StackFrame {
                    index,
                    symbol: symbol.to_string(),
                    location: None,
                });
            }
        }

        frames
    }

    pub fn is_internal(&self) -> bool {
        INTERNAL_PREFIXES
            .iter()
            .any(|prefix| self.symbol.starts_with(prefix))
    }
}

/// Header values never shown on the page
const REDACTED_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

const REDACTED: &str = "[redacted]";

/// View model of the development error page
///
/// Everything interpolated by the template is escaped; see `templates/trace.html`.
#[derive(Debug, Template)]
#[template(path = "trace.html")]
pub struct TracePage {
    pub name: String,
    pub message: String,
    pub status: u16,
    pub reason: &'static str,
    pub causes: Vec<String>,
    pub frames: Vec<StackFrame>,
    /// Shown verbatim when no frame could be parsed
    pub raw_stack: String,
    pub method: String,
    pub uri: String,
    pub request_id: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl TracePage {
    /// Marker carried by the root element of every rendered page
    pub const SIGNATURE: &'static str = "id=\"harbor-trace\"";

    pub fn new(error: &HttpException, ctx: &HttpContext) -> Self {
        let stack = error.stack();
        let frames = StackFrame::parse_all(stack);
        let raw_stack = if frames.is_empty() {
            stack.to_string()
        } else {
            String::new()
        };

        let request = &ctx.request;
        let headers = request
            .headers()
            .iter()
            .map(|(name, value)| {
                let value = if REDACTED_HEADERS.contains(&name.as_str()) {
                    REDACTED
                } else {
                    value.to_str().unwrap_or("<binary>")
                };
                (name.as_str().to_string(), value.to_string())
            })
            .collect();

        Self {
            name: error.name().to_string(),
            message: error.message().to_string(),
            status: error.status().as_u16(),
            reason: error.status().canonical_reason().unwrap_or(""),
            causes: error.causes(),
            frames,
            raw_stack,
            method: request.method().to_string(),
            uri: request.uri().to_string(),
            request_id: request.id().map(str::to_string),
            headers,
        }
    }
}
