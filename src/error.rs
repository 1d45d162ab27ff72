//! Custom error types for the dashboard
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>

use thiserror::Error;

/// Top-level dashboard errors
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Invalid target price {price} for {symbol}")]
    InvalidTargetPrice { symbol: String, price: f64 },

    #[error("Unknown alert condition: {input}")]
    InvalidCondition { input: String },
}

/// Errors raised by the commentary text generator.
///
/// These never reach dashboard callers: the commentary desk collapses all of
/// them into a fallback string.
#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("LLM API error: {0}")]
    Api(#[from] async_openai::error::OpenAIError),

    #[error("LLM returned no choices")]
    NoChoices,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<String> for DashboardError {
    fn from(err: String) -> Self {
        DashboardError::Config(err)
    }
}

impl From<&str> for DashboardError {
    fn from(err: &str) -> Self {
        DashboardError::Config(err.to_string())
    }
}

impl From<&str> for CommentaryError {
    fn from(err: &str) -> Self {
        CommentaryError::Other(err.to_string())
    }
}
