use thiserror::Error;

/// Rejection of an insert/update/remove call, carried verbatim to the
/// placeholder's `binderror` channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bridge call failed: {code}: {message}")]
pub struct BridgeError {
    pub code: String,
    pub message: String,
}

impl BridgeError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn queue_full(capacity: usize) -> Self {
        Self::new(
            "queue_full",
            format!("bridge outbound queue full (cap={capacity})"),
        )
    }

    #[must_use]
    pub fn disconnected() -> Self {
        Self::new("bridge_disconnected", "bridge outbound channel disconnected")
    }

    #[must_use]
    pub fn closed() -> Self {
        Self::new("bridge_closed", "bridge dropped the call before it settled")
    }

    #[must_use]
    pub fn singleton_occupied(kind: &str, holder: &str) -> Self {
        Self::new(
            "singleton_occupied",
            format!("only one {kind} may be inserted per page (held by {holder})"),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("placeholder geometry unavailable")]
    GeometryUnavailable,
}
