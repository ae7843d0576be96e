//! # Mock Collection
//!
//! `MockCollection<D>` answers the same client API as a real collection
//! actor but from an expectation queue, enabling fast, deterministic tests
//! of workflow logic without spawning any actors.
//!
//! Two things a real actor makes awkward are easy here:
//!
//! - **Error injection** — e.g. `expect_commit().return_err(...)` to prove a
//!   failed checkout leaves the cart untouched.
//! - **Scripted feeds** — `expect_subscribe().return_snapshots(...)` delivers
//!   a predefined sequence of snapshots, so a test can assert exactly how
//!   state is rebuilt from each delivery.
//!
//! # Example
//! ```ignore
//! let mut mock = MockCollection::<Order>::new();
//! mock.expect_commit().return_err(StoreError::StoreClosed);
//!
//! let client = mock.client();
//! // drive the code under test with `client`...
//! mock.verify(); // every expectation was consumed
//! ```

use crate::client::CollectionClient;
use crate::document::Document;
use crate::error::StoreError;
use crate::message::CollectionRequest;
use crate::subscription::Subscription;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

enum Expectation<D: Document> {
    Get {
        response: Result<Option<D>, StoreError>,
    },
    Put {
        response: Result<(), StoreError>,
    },
    Patch {
        response: Result<D, StoreError>,
    },
    Commit {
        response: Result<(), StoreError>,
    },
    Subscribe {
        snapshots: Vec<Vec<D>>,
    },
}

/// A mock collection client with expectation tracking.
pub struct MockCollection<D: Document> {
    client: CollectionClient<D>,
    expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<D: Document> Default for MockCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> MockCollection<D> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<D>>(100);
        let expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone
                    .lock()
                    .expect("mock expectation lock poisoned")
                    .pop_front();

                match (request, expectation) {
                    (
                        CollectionRequest::Get { respond_to, .. },
                        Some(Expectation::Get { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Put { respond_to, .. },
                        Some(Expectation::Put { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Patch { respond_to, .. },
                        Some(Expectation::Patch { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Commit { respond_to, .. },
                        Some(Expectation::Commit { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Subscribe { respond_to, .. },
                        Some(Expectation::Subscribe { snapshots }),
                    ) => {
                        let (tx, rx) = mpsc::unbounded_channel();
                        for snapshot in snapshots {
                            let _ = tx.send(snapshot);
                        }
                        // Sender is dropped here, so the subscription ends
                        // after the scripted deliveries.
                        let _ = respond_to.send(Subscription::new(rx));
                    }
                    _ => {
                        panic!("unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> CollectionClient<D> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self) -> ExpectationBuilder<D, Option<D>> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Get {
            response,
        })
    }

    /// Expects a `put` operation.
    pub fn expect_put(&mut self) -> ExpectationBuilder<D, ()> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Put {
            response,
        })
    }

    /// Expects a `patch` operation.
    pub fn expect_patch(&mut self) -> ExpectationBuilder<D, D> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Patch {
            response,
        })
    }

    /// Expects a `commit` operation.
    pub fn expect_commit(&mut self) -> ExpectationBuilder<D, ()> {
        ExpectationBuilder::new(self.expectations.clone(), |response| Expectation::Commit {
            response,
        })
    }

    /// Expects a `subscribe` operation and scripts its deliveries.
    pub fn expect_subscribe(&mut self) -> SubscribeExpectationBuilder<D> {
        SubscribeExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let exps = self
            .expectations
            .lock()
            .expect("mock expectation lock poisoned");
        if !exps.is_empty() {
            panic!("not all expectations were met, {} remaining", exps.len());
        }
    }
}

/// Builder that attaches a response to an expected operation.
pub struct ExpectationBuilder<D: Document, T> {
    expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
    wrap: fn(Result<T, StoreError>) -> Expectation<D>,
}

impl<D: Document, T> ExpectationBuilder<D, T> {
    fn new(
        expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
        wrap: fn(Result<T, StoreError>) -> Expectation<D>,
    ) -> Self {
        Self { expectations, wrap }
    }

    /// The operation succeeds with `value`.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// The operation fails with `error`.
    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, StoreError>) {
        self.expectations
            .lock()
            .expect("mock expectation lock poisoned")
            .push_back((self.wrap)(response));
    }
}

/// Builder for `subscribe` expectations.
pub struct SubscribeExpectationBuilder<D: Document> {
    expectations: Arc<Mutex<VecDeque<Expectation<D>>>>,
}

impl<D: Document> SubscribeExpectationBuilder<D> {
    /// The subscription delivers exactly these snapshots, then ends.
    pub fn return_snapshots(self, snapshots: Vec<Vec<D>>) {
        self.expectations
            .lock()
            .expect("mock expectation lock poisoned")
            .push_back(Expectation::Subscribe { snapshots });
    }
}
