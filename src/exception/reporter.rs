use crate::exception::{ContextHook, ExceptionHandlerConfig, HttpException};
use crate::http::HttpContext;
use crate::logger::{LogFields, Logger};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Decides whether an exception is logged, and writes the entry
///
/// Precedence, first match wins:
/// 1. code in the ignore list → nothing
/// 2. status in the ignore list → nothing
/// 3. the exception has its own report hook → the hook logs
/// 4. default entry at error severity
pub struct ExceptionReporter {
    logger: Arc<dyn Logger>,
    ignore_codes: HashSet<String>,
    ignore_statuses: HashSet<u16>,
    context: Option<ContextHook>,
}

impl ExceptionReporter {
    pub fn new(config: &ExceptionHandlerConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            ignore_codes: config.ignore_codes.clone(),
            ignore_statuses: config.ignore_statuses.clone(),
            context: config.context.clone(),
        }
    }

    pub fn should_report(&self, error: &HttpException) -> bool {
        if error
            .code()
            .is_some_and(|code| self.ignore_codes.contains(code))
        {
            return false;
        }
        !self.ignore_statuses.contains(&error.status().as_u16())
    }

    /// Fields attached to the default log entry
    pub fn context(&self, ctx: &HttpContext) -> LogFields {
        let mut fields = LogFields::new();
        if let Some(id) = ctx.request.id() {
            fields.insert("request_id".to_string(), Value::String(id.to_string()));
        }
        if let Some(hook) = &self.context {
            fields.extend(hook(ctx));
        }
        fields
    }

    /// Log the exception. Never fails: sink errors are traced and dropped.
    pub fn report(&self, error: &HttpException, ctx: &HttpContext) {
        if !self.should_report(error) {
            tracing::debug!(
                status = error.status().as_u16(),
                code = error.code(),
                "Skipping report for ignored exception"
            );
            return;
        }

        if let Some(hook) = error.report_hook() {
            if let Err(e) = hook.report(error, self.logger.as_ref(), ctx) {
                tracing::warn!("Exception report hook failed: {}", e);
            }
            return;
        }

        let message = match error.code() {
            Some(code) => format!("{}: {}", code, error.message()),
            None => error.message().to_string(),
        };
        if let Err(e) = self.logger.error(&message, &self.context(ctx)) {
            tracing::warn!("Failed to log exception '{}': {}", message, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HarborError, Result};
    use crate::exception::ReportHook;
    use crate::logger::{MemoryLogger, Severity};
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
    use serde_json::json;

    fn context() -> HttpContext {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("req-42"));
        HttpContext::new(Method::GET, Uri::from_static("/"), headers)
    }

    fn reporter(config: ExceptionHandlerConfig) -> (ExceptionReporter, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        (ExceptionReporter::new(&config, logger.clone()), logger)
    }

    struct AuditHook;

    impl ReportHook for AuditHook {
        fn report(
            &self,
            error: &HttpException,
            logger: &dyn Logger,
            _ctx: &HttpContext,
        ) -> Result<()> {
            logger.debug(&format!("audit: {}", error.message()), &LogFields::new())
        }
    }

    struct BrokenLogger;

    impl Logger for BrokenLogger {
        fn log(&self, _: Severity, _: &str, _: &LogFields) -> Result<()> {
            Err(HarborError::logger("disk full"))
        }
    }

    #[test]
    fn test_reports_code_and_message() {
        let (reporter, logger) = reporter(ExceptionHandlerConfig::new());
        let error = HttpException::bad_request("bad request").with_code("E_BAD_REQUEST");

        reporter.report(&error, &context());

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Error);
        assert_eq!(entries[0].message, "E_BAD_REQUEST: bad request");
        assert_eq!(entries[0].fields["request_id"], "req-42");
    }

    #[test]
    fn test_message_only_without_code() {
        let (reporter, logger) = reporter(ExceptionHandlerConfig::new());
        reporter.report(&HttpException::new("boom"), &context());
        assert_eq!(logger.entries()[0].message, "boom");
    }

    #[test]
    fn test_ignored_code_is_not_logged() {
        let (reporter, logger) =
            reporter(ExceptionHandlerConfig::new().ignore_code("E_BAD_REQUEST"));
        let error = HttpException::bad_request("bad request").with_code("E_BAD_REQUEST");

        reporter.report(&error, &context());
        assert!(logger.is_empty());
    }

    #[test]
    fn test_ignored_status_is_not_logged() {
        let (reporter, logger) = reporter(ExceptionHandlerConfig::new().ignore_status(400));
        reporter.report(&HttpException::bad_request("bad request"), &context());
        assert!(logger.is_empty());

        reporter.report(
            &HttpException::new("boom").with_status(StatusCode::BAD_GATEWAY),
            &context(),
        );
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn test_context_hook_adds_fields() {
        let config = ExceptionHandlerConfig::new().context(|_ctx| {
            let mut fields = LogFields::new();
            fields.insert("username".to_string(), json!("virk"));
            fields
        });
        let (reporter, logger) = reporter(config);
        let error = HttpException::bad_request("bad request").with_code("E_BAD_REQUEST");

        reporter.report(&error, &context());

        let entries = logger.entries();
        let entry = &entries[0];
        assert_eq!(entry.message, "E_BAD_REQUEST: bad request");
        assert_eq!(entry.fields["username"], "virk");
        assert_eq!(entry.fields["request_id"], "req-42");
    }

    #[test]
    fn test_context_hook_overrides_request_id() {
        let config = ExceptionHandlerConfig::new().context(|_ctx| {
            let mut fields = LogFields::new();
            fields.insert("request_id".to_string(), json!("trace-9"));
            fields
        });
        let (reporter, _logger) = reporter(config);

        let fields = reporter.context(&context());

        assert_eq!(fields["request_id"], "trace-9");
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_report_hook_replaces_default_entry() {
        let (reporter, logger) = reporter(ExceptionHandlerConfig::new());
        let error = HttpException::new("boom").with_report_hook(AuditHook);

        reporter.report(&error, &context());

        let entries = logger.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, Severity::Debug);
        assert_eq!(entries[0].message, "audit: boom");
    }

    #[test]
    fn test_ignore_rules_run_before_report_hook() {
        let (reporter, logger) = reporter(ExceptionHandlerConfig::new().ignore_status(500));
        let error = HttpException::new("boom").with_report_hook(AuditHook);

        reporter.report(&error, &context());
        assert!(logger.is_empty());
    }

    #[test]
    fn test_logger_failure_is_swallowed() {
        let reporter =
            ExceptionReporter::new(&ExceptionHandlerConfig::new(), Arc::new(BrokenLogger));
        reporter.report(&HttpException::new("boom"), &context());
        reporter.report(
            &HttpException::new("boom").with_report_hook(AuditHook),
            &context(),
        );
    }
}
