use crate::config::ConfigService;
use crate::exception::ContextHook;
use crate::http::HttpContext;
use crate::logger::LogFields;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Policy for the exception handler
///
/// Replaces per-application handler subclasses: the ignore lists, the log
/// context enrichment and the development flag are all plain values here.
#[derive(Clone, Default)]
pub struct ExceptionHandlerConfig {
    /// Machine readable codes that are never logged
    pub ignore_codes: HashSet<String>,
    /// HTTP statuses that are never logged
    pub ignore_statuses: HashSet<u16>,
    /// Development mode: expose stack traces and the trace page
    pub debug: bool,
    pub context: Option<ContextHook>,
}

impl ExceptionHandlerConfig {
    pub const IGNORE_CODES_KEY: &'static str = "EXCEPTION_IGNORE_CODES";
    pub const IGNORE_STATUSES_KEY: &'static str = "EXCEPTION_IGNORE_STATUSES";

    pub fn new() -> Self {
        Self::default()
    }

    /// Read the policy from configuration.
    ///
    /// `debug` follows the application environment. Ignore lists are comma
    /// separated; statuses that are not valid numbers are skipped.
    pub fn from_config(config: &ConfigService) -> Self {
        let ignore_statuses = config
            .get_list(Self::IGNORE_STATUSES_KEY)
            .into_iter()
            .filter_map(|raw| match raw.parse::<u16>() {
                Ok(status) => Some(status),
                Err(_) => {
                    tracing::warn!(
                        "Skipping invalid status '{}' in {}",
                        raw,
                        Self::IGNORE_STATUSES_KEY
                    );
                    None
                }
            })
            .collect();

        Self {
            ignore_codes: config
                .get_list(Self::IGNORE_CODES_KEY)
                .into_iter()
                .collect(),
            ignore_statuses,
            debug: config.environment().is_development(),
            context: None,
        }
    }

    pub fn ignore_code(mut self, code: impl Into<String>) -> Self {
        self.ignore_codes.insert(code.into());
        self
    }

    pub fn ignore_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn ignore_status(mut self, status: u16) -> Self {
        self.ignore_statuses.insert(status);
        self
    }

    pub fn ignore_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.ignore_statuses.extend(statuses);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn context<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HttpContext) -> LogFields + Send + Sync + 'static,
    {
        self.context = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for ExceptionHandlerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExceptionHandlerConfig")
            .field("ignore_codes", &self.ignore_codes)
            .field("ignore_statuses", &self.ignore_statuses)
            .field("debug", &self.debug)
            .field("context", &self.context.is_some())
            .finish()
    }
}
