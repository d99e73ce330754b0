/*!
 * Error types for the vttreport application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to the remote generation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The call succeeded but the response carried no usable text.
    /// Distinct from transport errors, but retried within the same budget.
    #[error("No text content in response")]
    NoTextContent,

    /// The uploaded file never reached a ready indexing status within the
    /// poll budget
    #[error("Vector store indexing timed out after {attempts} poll attempt(s)")]
    IndexingTimeout {
        /// Number of poll attempts made before giving up
        attempts: u32,
    },
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Prompt configuration file is missing
    #[error("Config not found: {0}")]
    NotFound(String),

    /// Required credential is absent from the environment
    #[error("{0} is not set (load from .env or environment)")]
    MissingCredential(String),

    /// Input directory does not exist
    #[error("Data directory not found: {0}")]
    MissingDataDir(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the generation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from configuration loading or validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
