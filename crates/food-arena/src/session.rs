//! # Session Shell
//!
//! The only async glue in the client: it feeds events through the reducer,
//! executes the resulting effects against the store clients, and routes
//! settlements back in as events. Failures never escape the session — each
//! one becomes a settlement event or a notice, and the triggering action is
//! recoverable by user retry.

use crate::app::{AppEvent, AppState, Effect, Notice};
use crate::auth::{ensure_profile, AuthProvider};
use crate::model::{Order, OrderFilter, OrderId, OrderPatch, OrderStatus, Profile};
use crate::tracking::start_of_day;
use chrono::{DateTime, Local, Utc};
use feed_store::CollectionClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// One signed-in (or signing-in) client session.
pub struct Session {
    pub state: AppState,
    profiles: CollectionClient<Profile>,
    orders: CollectionClient<Order>,
    notices: Vec<Notice>,
    rng: StdRng,
}

impl Session {
    pub fn new(profiles: CollectionClient<Profile>, orders: CollectionClient<Order>) -> Self {
        Self {
            state: AppState::new(),
            profiles,
            orders,
            notices: Vec::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Runs the interactive sign-in and routes the outcome as an auth event.
    pub async fn sign_in(&mut self, provider: &dyn AuthProvider) {
        match provider.sign_in().await {
            Ok(identity) => {
                self.dispatch(AppEvent::AuthChanged(Some(identity))).await;
            }
            Err(e) => {
                warn!(error = %e, "Sign-in failed");
                self.dispatch(AppEvent::AuthFailed(e.to_string())).await;
            }
        }
    }

    pub async fn sign_out(&mut self, provider: &dyn AuthProvider) {
        provider.sign_out().await;
        self.dispatch(AppEvent::AuthChanged(None)).await;
    }

    /// Feeds one event through the reducer, executing effects and any
    /// follow-up events until the session is quiescent again.
    pub async fn dispatch(&mut self, event: AppEvent) {
        self.dispatch_at(event, Utc::now()).await;
    }

    /// Like [`dispatch`](Session::dispatch) with an explicit clock, for
    /// deterministic tests.
    pub async fn dispatch_at(&mut self, event: AppEvent, now: DateTime<Utc>) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            debug!(?event, "Dispatch");
            for effect in self.state.apply(event, now) {
                if let Some(follow_up) = self.perform(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }
    }

    /// Filter for today's orders of the signed-in user, or `None` before
    /// sign-in completes.
    pub fn today_filter(&self, now: DateTime<Local>) -> Option<OrderFilter> {
        self.state.profile.as_ref().map(|profile| OrderFilter {
            owner: profile.uid.clone(),
            since: start_of_day(now),
        })
    }

    /// Notices raised since the last drain — what a toast widget would show.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[instrument(skip(self, effect))]
    async fn perform(&mut self, effect: Effect) -> Option<AppEvent> {
        match effect {
            Effect::Notify(notice) => {
                self.push_notice(notice);
                None
            }
            Effect::OfferRetry(feed) => {
                self.push_notice(Notice::Retry(feed));
                None
            }
            Effect::LoadProfile(identity) => {
                match ensure_profile(&self.profiles, &identity, &mut self.rng).await {
                    Ok(profile) => Some(AppEvent::ProfileReady(profile)),
                    Err(e) => {
                        warn!(error = %e, "Profile bootstrap failed");
                        Some(AppEvent::AuthFailed(e.to_string()))
                    }
                }
            }
            Effect::PlaceOrders(orders) => {
                let ids: Vec<OrderId> = orders.iter().map(|o| o.id.clone()).collect();
                info!(count = orders.len(), "Submitting checkout batch");
                match self.orders.commit(orders).await {
                    Ok(()) => Some(AppEvent::CheckoutSettled(Ok(ids))),
                    Err(e) => {
                        warn!(error = %e, "Checkout batch failed");
                        Some(AppEvent::CheckoutSettled(Err(e.to_string())))
                    }
                }
            }
            Effect::CompleteOrder(id) => {
                match self
                    .orders
                    .patch(id.clone(), OrderPatch::Status(OrderStatus::Completed))
                    .await
                {
                    Ok(_) => Some(AppEvent::MarkCompleteSettled(Ok(id))),
                    Err(e) => {
                        warn!(order = %id, error = %e, "Mark-complete failed");
                        Some(AppEvent::MarkCompleteSettled(Err(e.to_string())))
                    }
                }
            }
        }
    }

    fn push_notice(&mut self, notice: Notice) {
        match &notice {
            Notice::Info(msg) => info!(notice = %msg, "Notice"),
            Notice::Error(msg) => warn!(notice = %msg, "Notice"),
            Notice::Retry(feed) => warn!(?feed, "Feed retry offered"),
        }
        self.notices.push(notice);
    }
}
