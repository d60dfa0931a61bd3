// SPDX-FileCopyrightText: 2026 Porter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Porter bot.

use thiserror::Error;

/// The primary error type used across all Porter adapter traits and core operations.
#[derive(Debug, Error)]
pub enum PorterError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    ///
    /// Callers on the authorization path treat this as transient and fail
    /// closed: the event is denied, never permitted.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, send failure, bad chat id).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A decision token that does not match the `scope target level` wire shape.
    ///
    /// Rejected and acknowledged to the sender; never causes a store mutation.
    #[error("malformed decision token: {0}")]
    MalformedToken(String),

    /// A state transition that would break a store invariant (owner demotion,
    /// second owner, multi-row update). Always rejected, never corrected.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
