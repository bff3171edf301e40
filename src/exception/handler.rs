use crate::config::ConfigService;
use crate::error::Result;
use crate::exception::{
    ExceptionHandlerConfig, ExceptionReporter, ExceptionResponder, HttpException,
};
use crate::http::{HttpContext, ResponseBody};
use crate::logger::{Logger, TracingLogger};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// Reports and renders exceptions raised while serving requests
pub struct ExceptionHandler {
    reporter: ExceptionReporter,
    responder: ExceptionResponder,
}

impl ExceptionHandler {
    pub fn new(config: ExceptionHandlerConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            reporter: ExceptionReporter::new(&config, logger),
            responder: ExceptionResponder::new(config.debug),
        }
    }

    /// Handler configured from the environment, logging through `tracing`
    pub fn from_config(config: &ConfigService) -> Self {
        let config = ExceptionHandlerConfig::from_config(config);
        tracing::debug!(?config, "Exception handler configured");
        Self::new(config, Arc::new(TracingLogger))
    }

    pub fn reporter(&self) -> &ExceptionReporter {
        &self.reporter
    }

    pub fn responder(&self) -> &ExceptionResponder {
        &self.responder
    }

    pub fn report(&self, error: &HttpException, ctx: &HttpContext) {
        self.reporter.report(error, ctx);
    }

    pub async fn handle(
        &self,
        error: &HttpException,
        ctx: &mut HttpContext,
    ) -> Result<ResponseBody> {
        self.responder.handle(error, ctx).await
    }

    /// Report, render and finalize into an axum response.
    ///
    /// When a handle hook returns a body without writing the response itself,
    /// that body is sent with the exception's status.
    pub async fn render(&self, error: &HttpException, mut ctx: HttpContext) -> Result<Response> {
        self.report(error, &ctx);
        let body = self.handle(error, &mut ctx).await?;

        if !ctx.response.has_body() {
            if !ctx.response.has_status() {
                ctx.response.status(error.status());
            }
            ctx.response.send(body, true);
        }
        ctx.response.finish();
        Ok(ctx.response.into_response())
    }
}
