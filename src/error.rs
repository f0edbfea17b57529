//! Error types for plotclient.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! [`ChannelError`] and [`ClientError`] are `Clone` because a single render
//! failure is handed to every caller coalesced onto the same request.

use thiserror::Error;

/// Result type alias for plotclient operations.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors that can occur outside the plot client core (transport, CLI, I/O).
#[derive(Debug, Error)]
pub enum PlotError {
    /// A plot client operation failed.
    #[error("Render failed: {0}")]
    Client(#[from] ClientError),

    /// The backend process could not be started.
    #[error("Failed to start backend `{command}`")]
    BackendSpawn {
        /// Program that was executed.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A wire message could not be encoded or decoded.
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A rendered payload was not valid base64.
    #[error("Invalid plot payload: {0}")]
    Payload(#[from] base64::DecodeError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No plot with the given id is known.
    #[error("Plot not found: {id}")]
    PlotNotFound {
        /// The requested plot id.
        id: String,
    },
}

impl PlotError {
    /// Create a BackendSpawn error.
    pub fn backend_spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::BackendSpawn {
            command: command.into(),
            source,
        }
    }

    /// Create a PlotNotFound error.
    pub fn plot_not_found(id: impl Into<String>) -> Self {
        Self::PlotNotFound { id: id.into() }
    }
}

/// A command-line or config value did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseError {
    /// What was being parsed, e.g. "render format".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseError {
    /// Create a ParseError.
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Failure reported by a render channel: the backend could not produce a
/// render, or the transport to it broke.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ChannelError {
    /// JSON-RPC error code, when the backend supplied one.
    pub code: Option<i64>,
    /// Human-readable description.
    pub message: String,
}

impl ChannelError {
    /// Create an error without a code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Create an error carrying a backend error code.
    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// The backend connection went away before answering.
    pub fn disconnected() -> Self {
        Self::new("backend disconnected")
    }
}

/// Errors returned by [`PlotClient`](crate::plot::PlotClient) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The render channel failed; propagated verbatim.
    #[error("render channel failure: {0}")]
    Channel(#[from] ChannelError),

    /// The client was closed before or during the operation.
    #[error("plot client {id} is closed")]
    Closed {
        /// Id of the closed client.
        id: String,
    },
}

impl ClientError {
    /// Create a Closed error.
    pub fn closed(id: impl Into<String>) -> Self {
        Self::Closed { id: id.into() }
    }

    /// Whether this error comes from operating on a closed client.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}
