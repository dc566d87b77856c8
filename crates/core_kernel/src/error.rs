//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    #[error("Insufficient funds: available={available}, requested={requested}")]
    InsufficientFunds { available: u64, requested: u64 },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn overflow(context: impl Into<String>) -> Self {
        CoreError::Overflow(context.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
