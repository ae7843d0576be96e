//! # Collection Actor
//!
//! The `CollectionActor` is the server half of a collection. It owns the
//! document map and the subscriber list, and processes every request
//! sequentially in its own task.
//!
//! # Concurrency Model
//! Exclusive ownership of state within one task replaces locking entirely:
//! a `Commit` either inserts all of its documents or none, and no other
//! request can interleave with it. Subscribers are notified after each
//! successful mutation, never in the middle of one, so a live feed can never
//! observe a partial batch. Subscribers are notified before the writer's ack,
//! so once a write has been acknowledged its feed delivery is already queued.

use crate::client::CollectionClient;
use crate::document::{Document, DocumentFilter};
use crate::error::StoreError;
use crate::message::CollectionRequest;
use crate::subscription::Subscription;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct Subscriber<D: Document> {
    filter: D::Filter,
    sender: mpsc::UnboundedSender<Vec<D>>,
}

/// The actor that owns one document collection.
///
/// Documents are kept in a `BTreeMap` so snapshots are always delivered in
/// ascending id order, which gives subscribers a deterministic tie-break
/// when they sort by other keys.
pub struct CollectionActor<D: Document> {
    receiver: mpsc::Receiver<CollectionRequest<D>>,
    docs: BTreeMap<D::Id, D>,
    subscribers: Vec<Subscriber<D>>,
}

impl<D: Document> CollectionActor<D> {
    /// Creates a new collection actor and its associated client.
    ///
    /// `buffer_size` is the capacity of the request channel; senders wait
    /// when it is full.
    pub fn new(buffer_size: usize) -> (Self, CollectionClient<D>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            docs: BTreeMap::new(),
            subscribers: Vec::new(),
        };
        (actor, CollectionClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self) {
        let collection = std::any::type_name::<D>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(collection, "Collection started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Get { id, respond_to } => {
                    let doc = self.docs.get(&id).cloned();
                    debug!(collection, %id, found = doc.is_some(), "Get");
                    let _ = respond_to.send(Ok(doc));
                }
                CollectionRequest::Put { doc, respond_to } => {
                    let id = doc.id();
                    debug!(collection, %id, "Put");
                    match doc.validate() {
                        Ok(()) => {
                            self.docs.insert(id.clone(), doc);
                            info!(collection, %id, size = self.docs.len(), "Stored");
                            self.broadcast();
                            let _ = respond_to.send(Ok(()));
                        }
                        Err(e) => {
                            warn!(collection, %id, error = %e, "Put rejected");
                            let _ = respond_to.send(Err(StoreError::rejected(e)));
                        }
                    }
                }
                CollectionRequest::Patch {
                    id,
                    patch,
                    respond_to,
                } => {
                    debug!(collection, %id, ?patch, "Patch");
                    match self.docs.get_mut(&id) {
                        Some(doc) => {
                            // Patch against a scratch copy so a rejected
                            // update leaves the stored document untouched.
                            let mut updated = doc.clone();
                            match updated.apply(patch) {
                                Ok(()) => {
                                    *doc = updated.clone();
                                    info!(collection, %id, "Patched");
                                    self.broadcast();
                                    let _ = respond_to.send(Ok(updated));
                                }
                                Err(e) => {
                                    warn!(collection, %id, error = %e, "Patch rejected");
                                    let _ = respond_to.send(Err(StoreError::rejected(e)));
                                }
                            }
                        }
                        None => {
                            warn!(collection, %id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        }
                    }
                }
                CollectionRequest::Commit { docs, respond_to } => {
                    debug!(collection, count = docs.len(), "Commit");
                    match self.check_batch(&docs) {
                        Ok(()) => {
                            let count = docs.len();
                            for doc in docs {
                                self.docs.insert(doc.id(), doc);
                            }
                            info!(collection, count, size = self.docs.len(), "Committed");
                            self.broadcast();
                            let _ = respond_to.send(Ok(()));
                        }
                        Err(e) => {
                            warn!(collection, error = %e, "Commit rejected, nothing stored");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                CollectionRequest::Subscribe { filter, respond_to } => {
                    let (sender, receiver) = mpsc::unbounded_channel();
                    // Initial delivery so the subscriber starts from the
                    // current state instead of waiting for the next change.
                    let _ = sender.send(self.snapshot(&filter));
                    debug!(collection, ?filter, "Subscribe");
                    self.subscribers.push(Subscriber { filter, sender });
                    let _ = respond_to.send(Subscription::new(receiver));
                }
            }
        }

        info!(collection, size = self.docs.len(), "Shutdown");
    }

    /// All-or-nothing precondition check for a batch commit.
    fn check_batch(&self, docs: &[D]) -> Result<(), StoreError> {
        let mut seen = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.id();
            if self.docs.contains_key(&id) || seen.contains(&id) {
                return Err(StoreError::Conflict(id.to_string()));
            }
            doc.validate().map_err(StoreError::rejected)?;
            seen.push(id);
        }
        Ok(())
    }

    fn snapshot(&self, filter: &D::Filter) -> Vec<D> {
        self.docs
            .values()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect()
    }

    /// Re-delivers the full matching set to every live subscriber and prunes
    /// the ones that have been dropped.
    fn broadcast(&mut self) {
        let docs = &self.docs;
        self.subscribers.retain(|sub| {
            let snapshot: Vec<D> = docs
                .values()
                .filter(|doc| sub.filter.matches(doc))
                .cloned()
                .collect();
            sub.sender.send(snapshot).is_ok()
        });
    }
}
