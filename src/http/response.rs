use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// A response body together with its representation
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    #[default]
    Empty,
    Text(String),
    Html(String),
    Json(Value),
}

impl ResponseBody {
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            ResponseBody::Empty => None,
            ResponseBody::Text(_) => Some("text/plain; charset=utf-8"),
            ResponseBody::Html(_) => Some("text/html; charset=utf-8"),
            ResponseBody::Json(_) => Some("application/json"),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) | ResponseBody::Html(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Json(value)
    }
}

/// Outbound response under construction
///
/// The body can be written several times; the last write wins. A response
/// written with `end = false` stays open so the pipeline can still finalize it.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Option<ResponseBody>,
    finished: bool,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = Some(status);
        self
    }

    pub fn current_status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn has_status(&self) -> bool {
        self.status.is_some()
    }

    pub fn header(&mut self, name: header::HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Store the body; `end` marks the response as final
    pub fn send(&mut self, body: impl Into<ResponseBody>, end: bool) -> &mut Self {
        self.body = Some(body.into());
        self.finished = end;
        self
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    pub fn body(&self) -> Option<&ResponseBody> {
        self.body.as_ref()
    }
}

impl IntoResponse for ResponseWriter {
    fn into_response(self) -> Response {
        let status = self.current_status();
        let body = self.body.unwrap_or_default();
        let mut response = body.into_response();
        *response.status_mut() = status;
        response.headers_mut().extend(self.headers);
        response
    }
}

impl IntoResponse for ResponseBody {
    fn into_response(self) -> Response {
        let content_type = self.content_type();
        let body = match self {
            ResponseBody::Empty => Body::empty(),
            ResponseBody::Text(text) | ResponseBody::Html(text) => Body::from(text),
            ResponseBody::Json(value) => Body::from(value.to_string()),
        };

        let mut response = Response::new(body);
        if let Some(content_type) = content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        response
    }
}
