//! Error handling utilities for the crate
use std::path::PathBuf;

use thiserror::Error;

use reqwest::Error as ReqwestError;

/// All errors raised by this crate will be instances of GofileError
#[derive(Error, Debug)]
pub enum GofileError {
    #[error("No authentication token. Expected environment variable GOFILE_API_TOKEN to contain a token")]
    NotAuthenticated(),
    #[error("Could not open {}", .0.display())]
    FileOpen(PathBuf, #[source] std::io::Error),
    #[error("Internal HTTP error: {0}")]
    HttpError(#[from] ReqwestError),
    #[error("Could not decode API response: {0}")]
    DecodeError(#[from] serde_json::Error),
    #[error("Attribute {attribute} expects {expected}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
    },
    #[error("Unsupported attribute: {0}")]
    UnsupportedAttribute(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("API rejected the request ({0}): {1}")]
    ApiError(u16, String),
    #[error("Unknown error ({0}): {1}")]
    UnknownError(u16, String),
}

impl GofileError {
    pub fn unknown_error(status_code: reqwest::StatusCode) -> Self {
        GofileError::UnknownError(
            status_code.as_u16(),
            status_code
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
        )
    }

    pub fn required(field_name: &str) -> Self {
        GofileError::InvalidInput(format!("{} is required", field_name))
    }

    pub fn type_mismatch(attribute: &str, expected: &'static str) -> Self {
        GofileError::TypeMismatch {
            attribute: attribute.to_string(),
            expected,
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, GofileError>;
