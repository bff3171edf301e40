use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarborError>;

#[derive(Debug, Error)]
pub enum HarborError {
    #[error("Logger failed to write entry: {message}")]
    Logger { message: String },

    #[error("Exception handle hook failed: {0}")]
    HandleHook(#[source] anyhow::Error),

    #[error("Unknown application environment: {value}")]
    InvalidEnvironment { value: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarborError {
    pub fn logger(message: impl Into<String>) -> Self {
        HarborError::Logger {
            message: message.into(),
        }
    }
}

impl axum::response::IntoResponse for HarborError {
    fn into_response(self) -> axum::response::Response {
        // Internals never leak past the fault boundary; the caller logs them.
        let status = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
        (status, "Internal Server Error").into_response()
    }
}
