use crate::error::{HarborError, Result};
use crate::exception::HttpException;
use crate::exception::TracePage;
use crate::http::{HttpContext, ResponseBody};
use askama::Template;
use serde_json::{Map, Value, json};

/// Representation picked by content negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Representation {
    Json,
    JsonApi,
    Html,
}

impl Representation {
    /// Order matters: wildcards resolve to the first candidate
    const CANDIDATES: [&'static str; 3] = ["json", "jsonapi", "html"];

    fn negotiate(ctx: &HttpContext) -> Self {
        match ctx.request.accepts(&Self::CANDIDATES) {
            Some("html") => Representation::Html,
            Some("jsonapi") => Representation::JsonApi,
            _ => Representation::Json,
        }
    }
}

/// Body sent to browsers outside development mode
#[derive(Template)]
#[template(source = "<h1> {{ message }} </h1>", ext = "html")]
struct MessagePage<'a> {
    message: &'a str,
}

/// Decides what the client sees for an exception
pub struct ExceptionResponder {
    debug: bool,
}

impl ExceptionResponder {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Render the exception into the context's response.
    ///
    /// An exception with a handle hook is handed over entirely: the hook's
    /// body is returned as-is and nothing is written here. Otherwise the
    /// body is negotiated, written with `end = false`, and also returned.
    pub async fn handle(
        &self,
        error: &HttpException,
        ctx: &mut HttpContext,
    ) -> Result<ResponseBody> {
        if let Some(hook) = error.handle_hook() {
            return hook
                .handle(error, ctx)
                .await
                .map_err(HarborError::HandleHook);
        }

        let body = match Representation::negotiate(ctx) {
            Representation::Html => self.html_body(error, ctx)?,
            Representation::JsonApi => self.json_api_body(error),
            Representation::Json => self.json_body(error),
        };

        ctx.response
            .status(error.status())
            .send(body.clone(), false);
        Ok(body)
    }

    fn json_body(&self, error: &HttpException) -> ResponseBody {
        let mut body = json!({ "message": error.message() });
        if self.debug {
            body["stack"] = Value::String(error.stack().to_string());
        }
        ResponseBody::Json(body)
    }

    fn json_api_body(&self, error: &HttpException) -> ResponseBody {
        let mut entry = Map::new();
        entry.insert("title".into(), json!(error.message()));
        if let Some(code) = error.code() {
            entry.insert("code".into(), json!(code));
        }
        entry.insert("status".into(), json!(error.status().as_u16().to_string()));
        if self.debug {
            entry.insert("stack".into(), json!(error.stack()));
        }
        ResponseBody::Json(json!({ "errors": [entry] }))
    }

    fn html_body(&self, error: &HttpException, ctx: &HttpContext) -> Result<ResponseBody> {
        let html = if self.debug {
            TracePage::new(error, ctx).render()?
        } else {
            MessagePage {
                message: error.message(),
            }
            .render()?
        };
        Ok(ResponseBody::Html(html))
    }
}
