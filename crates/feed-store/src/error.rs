//! # Store Errors
//!
//! Common error types shared by every collection actor and client. Document
//! validation and patch failures are carried as boxed source errors so one
//! enum covers all collections.

/// Errors that can occur when talking to a collection actor.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store closed")]
    StoreClosed,
    #[error("store dropped response channel")]
    StoreDropped,
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("document id conflict: {0}")]
    Conflict(String),
    #[error("document rejected: {0}")]
    Rejected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub(crate) fn rejected<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Rejected(Box::new(err))
    }
}
