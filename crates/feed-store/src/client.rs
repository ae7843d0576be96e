//! # Collection Client
//!
//! The cloneable interface half of a collection. Holds only a channel
//! sender, so it is cheap to clone and share across tasks.

use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use crate::subscription::Subscription;
use tokio::sync::{mpsc, oneshot};

/// Type-safe async client for one [`CollectionActor`](crate::CollectionActor).
#[derive(Debug, Clone)]
pub struct CollectionClient<D: Document> {
    sender: mpsc::Sender<CollectionRequest<D>>,
}

impl<D: Document> CollectionClient<D> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<D>>) -> Self {
        Self { sender }
    }

    /// Point read by id.
    pub async fn get(&self, id: D::Id) -> Result<Option<D>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Get { id, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Validate-then-upsert a single document, keyed by `doc.id()`.
    pub async fn put(&self, doc: D) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Put { doc, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Partial update of a single document. Returns the updated document.
    pub async fn patch(&self, id: D::Id, patch: D::Patch) -> Result<D, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Patch {
                id,
                patch,
                respond_to,
            })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Atomic multi-document create: either every document is stored or none
    /// is, and subscribers only ever observe the full batch.
    pub async fn commit(&self, docs: Vec<D>) -> Result<(), StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Commit { docs, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Opens a filtered live feed over the collection.
    ///
    /// The current matching set is delivered immediately; afterwards the
    /// full matching set is re-delivered on every successful mutation.
    pub async fn subscribe(&self, filter: D::Filter) -> Result<Subscription<D>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CollectionRequest::Subscribe { filter, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)
    }
}
