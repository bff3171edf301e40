use crate::exception::{ExceptionHandler, RaisedException};
use crate::http::HttpContext;
use axum::{body::Body, http::Request, response::IntoResponse, response::Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Tower Layer that renders raised [`HttpException`](super::HttpException)s
///
/// Handlers return `Result<_, HttpException>`; the exception travels in the
/// response extensions and is reported and rendered here, with the request
/// context it was raised in.
#[derive(Clone)]
pub struct ExceptionLayer {
    handler: Arc<ExceptionHandler>,
}

impl ExceptionLayer {
    pub fn new(handler: Arc<ExceptionHandler>) -> Self {
        Self { handler }
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            handler: self.handler.clone(),
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    handler: Arc<ExceptionHandler>,
}

impl<S> Service<Request<Body>> for ExceptionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let handler = self.handler.clone();

        // Keep the instance that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let method = request.method().clone();
        let uri = request.uri().clone();
        let headers = request.headers().clone();

        Box::pin(async move {
            let mut response = inner.call(request).await?;

            let Some(RaisedException(error)) = response.extensions_mut().remove::<RaisedException>()
            else {
                return Ok(response);
            };

            let mut ctx = HttpContext::new(method, uri, headers);
            if ctx.request.id().is_none() {
                ctx = ctx.with_request_id(Uuid::new_v4().to_string());
            }

            match handler.render(&error, ctx).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    tracing::error!(
                        status = error.status().as_u16(),
                        "Failed to render exception '{}': {}",
                        error,
                        e
                    );
                    Ok(e.into_response())
                }
            }
        })
    }
}
