//! # Collection Messages
//!
//! The typed message set exchanged between a [`CollectionClient`] and its
//! [`CollectionActor`]. Every request carries a oneshot channel for the
//! reply, so callers suspend only until the actor has processed their
//! message.
//!
//! [`CollectionClient`]: crate::CollectionClient
//! [`CollectionActor`]: crate::CollectionActor

use crate::document::Document;
use crate::error::StoreError;
use crate::subscription::Subscription;
use tokio::sync::oneshot;

/// One-shot reply channel used by the collection actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Request sent to a collection actor.
///
/// The variants cover exactly the store operations the workflow needs:
/// point read, validate-then-upsert, single-document partial update, atomic
/// multi-document commit, and filtered live subscription. There is no
/// delete — nothing in the order lifecycle removes documents.
#[derive(Debug)]
pub enum CollectionRequest<D: Document> {
    Get {
        id: D::Id,
        respond_to: Response<Option<D>>,
    },
    Put {
        doc: D,
        respond_to: Response<()>,
    },
    Patch {
        id: D::Id,
        patch: D::Patch,
        respond_to: Response<D>,
    },
    Commit {
        docs: Vec<D>,
        respond_to: Response<()>,
    },
    Subscribe {
        filter: D::Filter,
        respond_to: oneshot::Sender<Subscription<D>>,
    },
}
