//! Error types for the financial query router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {

    // =============================
    // Agent Errors
    // =============================

    #[error("Agent error: {0}")]
    AgentError(String),

    #[error("Agent not configured: {0}")]
    AgentNotConfigured(String),

    // =============================
    // Surrounding Application Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    // =============================
    // External Library Conversions
    // =============================

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}
