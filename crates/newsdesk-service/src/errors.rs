use std::fmt;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::views;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Database connection error: {0}")]
    ConnectionError(#[from] diesel::ConnectionError),

    #[error("Schema migration failed: {0}")]
    MigrationError(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::SelectorError {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::HttpError(ref err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::DatabaseError(_)
            | AppError::ConnectionError(_)
            | AppError::MigrationError(_)
            | AppError::LockPoisoned => {
                // Log the detailed error but don't expose it to the client
                error!(error = %self, "Store error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Html(views::error_page(status, &message))).into_response()
    }
}
