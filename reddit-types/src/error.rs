//! Error taxonomy for tool calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a failed tool call.
///
/// Every kind except [`ErrorKind::TransportError`] is recovered at the
/// server boundary and delivered to the caller as a structured result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// No tool with the requested name is registered.
    UnknownTool,
    /// A required argument was absent, null, or blank.
    MissingArgument,
    /// An argument had the wrong primitive type.
    TypeMismatch,
    /// A numeric argument fell outside its declared range.
    OutOfRange,
    /// A mutating tool was called without write credentials.
    PermissionDenied,
    /// The upstream Reddit service failed or could not be reached.
    UpstreamUnavailable,
    /// The subreddit, post, or comment does not exist.
    NotFound,
    /// The call did not complete within the configured bound.
    Timeout,
    /// The session transport failed. Terminal for the session.
    TransportError,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 9] = [
        Self::UnknownTool,
        Self::MissingArgument,
        Self::TypeMismatch,
        Self::OutOfRange,
        Self::PermissionDenied,
        Self::UpstreamUnavailable,
        Self::NotFound,
        Self::Timeout,
        Self::TransportError,
    ];

    /// Whether this kind ends the session it occurred on.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::TransportError)
    }

    /// Whether a caller may reasonably retry the same call later.
    ///
    /// Nothing in this workspace retries automatically; this is a hint for
    /// front-ends deciding what to offer the user.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Timeout | Self::UpstreamUnavailable)
    }

    /// The kind's name as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownTool => "UnknownTool",
            Self::MissingArgument => "MissingArgument",
            Self::TypeMismatch => "TypeMismatch",
            Self::OutOfRange => "OutOfRange",
            Self::PermissionDenied => "PermissionDenied",
            Self::UpstreamUnavailable => "UpstreamUnavailable",
            Self::NotFound => "NotFound",
            Self::Timeout => "Timeout",
            Self::TransportError => "TransportError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified tool-call failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ToolError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Human-readable detail, safe to show verbatim.
    pub message: String,
}

impl ToolError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// [`ErrorKind::UnknownTool`] for the named tool.
    #[must_use]
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorKind::UnknownTool, format!("unknown tool: {name}"))
    }

    /// [`ErrorKind::MissingArgument`].
    #[must_use]
    pub fn missing_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingArgument, message)
    }

    /// [`ErrorKind::TypeMismatch`].
    #[must_use]
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, message)
    }

    /// [`ErrorKind::OutOfRange`].
    #[must_use]
    pub fn out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, message)
    }

    /// [`ErrorKind::PermissionDenied`].
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message)
    }

    /// [`ErrorKind::UpstreamUnavailable`].
    #[must_use]
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamUnavailable, message)
    }

    /// [`ErrorKind::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// [`ErrorKind::Timeout`].
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// [`ErrorKind::TransportError`].
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportError, message)
    }
}
