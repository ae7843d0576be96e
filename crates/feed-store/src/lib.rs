//! # Feed Store
//!
//! An in-process document store built on the actor model. Each document
//! collection is owned by a single [`CollectionActor`] task; all access goes
//! through a cloneable [`CollectionClient`] speaking typed messages over a
//! Tokio mpsc channel. Because every collection processes its messages
//! sequentially, there are no locks and no partial states: a batch
//! [`commit`](CollectionClient::commit) is observed either in full or not at
//! all.
//!
//! ## Core Abstractions
//!
//! 1. **[`Document`]** — the contract a stored type implements: identity,
//!    boundary validation, and partial updates ([`Document::Patch`]).
//! 2. **[`CollectionActor`]** — the server half; owns the documents and the
//!    live subscriber list.
//! 3. **[`CollectionClient`]** — the interface half; point reads and writes,
//!    atomic batch commits, and filtered live subscriptions.
//!
//! ## Live Subscriptions
//!
//! [`CollectionClient::subscribe`] returns a [`Subscription`] that receives
//! the full matching result set immediately and again after every successful
//! mutation of the collection. A subscription is torn down by dropping it;
//! the actor prunes disconnected subscribers on the next broadcast. Consumers
//! should treat each delivery as a wholesale replacement of the previous one,
//! which makes re-rendering idempotent regardless of delivery order.
//!
//! ## Testing
//!
//! [`mock::MockCollection`] implements the same client API against an
//! expectation queue, including scripted snapshot sequences for
//! subscriptions and error injection for commit failures. See the [`mock`]
//! module.

pub mod actor;
pub mod client;
pub mod document;
pub mod error;
pub mod message;
pub mod mock;
pub mod subscription;

pub use actor::CollectionActor;
pub use client::CollectionClient;
pub use document::{Document, DocumentFilter, Everything};
pub use error::StoreError;
pub use message::{CollectionRequest, Response};
pub use subscription::Subscription;
