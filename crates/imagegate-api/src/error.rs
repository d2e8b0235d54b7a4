//! Error types for imagegate-api

use std::path::PathBuf;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

/// Result type alias for imagegate-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or running the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid configuration value or combination
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// Config file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    ConfigRead {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::GateConfig`]
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Config could not be rendered as TOML
    #[error("Failed to render config: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// Binding or serving failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

/// Errors returned to HTTP clients
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApiError {
    /// Body is not JSON, or `filenames` is not an array of strings
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The authorization gate denied the request
    #[error("Unauthorized")]
    Unauthorized,

    /// Unexpected server-side failure outside the auth layer
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ApiError::InvalidRequestBody(_) => "Invalid request body.".to_string(),
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.client_message() });
        (self.status(), Json(body)).into_response()
    }
}
