//! # Document Trait
//!
//! The `Document` trait defines the contract every stored type (Profile,
//! Canteen, Order, …) must implement to be managed by a generic
//! [`CollectionActor`](crate::CollectionActor). It specifies associated types
//! for identity, partial updates, and subscription filters, and gives the
//! store a boundary at which malformed documents are rejected instead of
//! silently propagated.
//!
//! # Architecture Note
//! By defining one contract that all document types satisfy, the collection
//! actor logic is written once and reused for every collection. Associated
//! types keep the API fully typed: a Canteen patch cannot be sent to the
//! Order collection, and the compiler enforces it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

/// Contract a stored type must implement to live in a collection.
///
/// Documents are validated at the write boundary ([`Document::validate`]);
/// a document that fails validation is never inserted. Partial updates go
/// through [`Document::apply`], which may also reject — for example an order
/// refusing a backward status transition — in which case the stored document
/// stays exactly as it was.
pub trait Document: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable identity of this document within its collection.
    type Id: Ord + Eq + Clone + Display + Debug + Send + Sync + 'static;

    /// Partial-update payload for a single document.
    type Patch: Debug + Send + 'static;

    /// Filter used by live subscriptions over this collection.
    type Filter: DocumentFilter<Self> + Debug + Send + Sync + 'static;

    /// The error type for validation and patch failures.
    type Error: std::error::Error + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Boundary validation, run before any insert.
    fn validate(&self) -> Result<(), Self::Error>;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
}

/// Predicate a live subscription uses to select documents.
pub trait DocumentFilter<D> {
    fn matches(&self, doc: &D) -> bool;
}

/// Filter that matches every document in the collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Everything;

impl<D> DocumentFilter<D> for Everything {
    fn matches(&self, _doc: &D) -> bool {
        true
    }
}
