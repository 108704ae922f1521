//! Domain error taxonomy.
//!
//! Every business-rule violation raised by the services is a [`CoreError`]
//! carrying one of three kinds plus a human-readable message. Storage
//! failures travel through the same `Result` channel as an opaque
//! [`StoreError`] so the transport boundary can report them as internal
//! failures without mistaking them for rule violations.

/// An unclassified failure from a storage backend.
///
/// Opaque to the domain layer: the services never inspect it, only
/// propagate it.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct StoreError(#[from] anyhow::Error);

impl StoreError {
    /// Wrap any error value raised by a storage backend.
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(err.into())
    }

    /// Build a storage error from a plain message.
    pub fn message(msg: impl Into<String>) -> Self {
        Self(anyhow::Error::msg(msg.into()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity exists but its current state forbids the operation.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// Reserved for malformed requests. The services never raise this
    /// today; input-shape checks happen in the transport shell.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A storage failure, propagated as-is.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
