//! # Application State
//!
//! A reducer-style store for the whole client: every mutation goes through
//! [`AppState::apply`], which takes one event and returns the effects the
//! shell must execute. This keeps mutation sites enumerable and lets tests
//! drive the workflow with synthetic events, no rendering involved.
//!
//! `apply` is synchronous and pure apart from the state it owns; anything
//! that touches the store or the identity provider comes back as an
//! [`Effect`] and re-enters as a settlement event.

use crate::cart::Cart;
use crate::catalog::{CatalogIndex, DishView};
use crate::checkout::materialize;
use crate::model::{Canteen, CanteenId, EatingMode, Identity, Order, OrderId, Profile};
use crate::tracking::OrderBoard;
use chrono::{DateTime, Utc};

/// The screens of the client. Rendering is external; the workflow only
/// tracks which screen is active and the history behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    SignIn,
    Arena,
    CanteenMenu(CanteenId),
    DishDetail(String),
    Cart,
    Orders,
}

/// Which live feed an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    Catalog,
    Orders,
}

/// Transient user-facing message, the toast stand-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
    /// Render as a retry affordance for a failed feed; previously rendered
    /// state stays on screen.
    Retry(Feed),
}

/// Everything that can happen to the client.
#[derive(Debug, Clone)]
pub enum AppEvent {
    AuthChanged(Option<Identity>),
    AuthFailed(String),
    ProfileReady(Profile),
    CatalogSnapshot(Vec<Canteen>),
    OrdersSnapshot(Vec<Order>),
    FeedFailed { feed: Feed, reason: String },
    AddToCart(DishView),
    StepQuantity { line: usize, delta: i32 },
    EditNotes { line: usize, text: String },
    SelectMode(EatingMode),
    CheckoutRequested,
    CheckoutSettled(Result<Vec<OrderId>, String>),
    MarkCompleteRequested(OrderId),
    MarkCompleteSettled(Result<OrderId, String>),
    Navigate(View),
    Back,
}

/// Work the shell must do on behalf of the reducer.
#[derive(Debug, Clone)]
pub enum Effect {
    Notify(Notice),
    LoadProfile(Identity),
    /// Submit the materialized orders as one atomic batch; settle with
    /// [`AppEvent::CheckoutSettled`].
    PlaceOrders(Vec<Order>),
    /// Patch a single order to `Completed`; settle with
    /// [`AppEvent::MarkCompleteSettled`].
    CompleteOrder(OrderId),
    OfferRetry(Feed),
}

/// The client's entire mutable state.
#[derive(Debug)]
pub struct AppState {
    pub profile: Option<Profile>,
    pub catalog: CatalogIndex,
    pub cart: Cart,
    pub board: OrderBoard,
    pub mode: EatingMode,
    pub view: View,
    history: Vec<View>,
    /// Guard against duplicate submission: set when a checkout is handed to
    /// the store, cleared only when the attempt settles.
    pub checkout_pending: bool,
    order_seq: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            profile: None,
            catalog: CatalogIndex::default(),
            cart: Cart::default(),
            board: OrderBoard::default(),
            mode: EatingMode::DineIn,
            view: View::SignIn,
            history: Vec::new(),
            checkout_pending: false,
            order_seq: 0,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event and returns the effects to execute.
    pub fn apply(&mut self, event: AppEvent, now: DateTime<Utc>) -> Vec<Effect> {
        match event {
            AppEvent::AuthChanged(Some(identity)) => {
                vec![Effect::LoadProfile(identity)]
            }
            AppEvent::AuthChanged(None) => {
                *self = Self::default();
                Vec::new()
            }
            AppEvent::AuthFailed(reason) => {
                // Stay on the sign-in view; retry is invoking sign-in again.
                vec![Effect::Notify(Notice::Error(format!(
                    "sign-in failed: {reason}"
                )))]
            }
            AppEvent::ProfileReady(profile) => {
                self.profile = Some(profile);
                if self.view == View::SignIn {
                    self.view = View::Arena;
                    self.history.clear();
                }
                Vec::new()
            }
            AppEvent::CatalogSnapshot(canteens) => {
                self.catalog = CatalogIndex::rebuild(&canteens);
                Vec::new()
            }
            AppEvent::OrdersSnapshot(orders) => {
                self.board = OrderBoard::from_snapshot(orders);
                Vec::new()
            }
            AppEvent::FeedFailed { feed, reason } => {
                // Previously rendered state stays; offer a retry instead of
                // blanking anything.
                vec![
                    Effect::Notify(Notice::Error(format!("feed unavailable: {reason}"))),
                    Effect::OfferRetry(feed),
                ]
            }
            AppEvent::AddToCart(dish) => {
                let name = dish.name.clone();
                self.cart.add(dish);
                vec![Effect::Notify(Notice::Info(format!("{name} added to cart")))]
            }
            AppEvent::StepQuantity { line, delta } => {
                self.cart.step_quantity(line, delta);
                Vec::new()
            }
            AppEvent::EditNotes { line, text } => {
                self.cart.set_notes(line, text);
                Vec::new()
            }
            AppEvent::SelectMode(mode) => {
                self.mode = mode;
                Vec::new()
            }
            AppEvent::CheckoutRequested => self.checkout(now),
            AppEvent::CheckoutSettled(Ok(_)) => {
                self.checkout_pending = false;
                self.cart.clear();
                self.navigate(View::Orders);
                vec![Effect::Notify(Notice::Info(
                    "payment successful, order placed".to_string(),
                ))]
            }
            AppEvent::CheckoutSettled(Err(reason)) => {
                // The cart is exactly as it was; the same checkout can be
                // retried without side effects from the failed attempt.
                self.checkout_pending = false;
                vec![Effect::Notify(Notice::Error(format!(
                    "payment failed: {reason}"
                )))]
            }
            AppEvent::MarkCompleteRequested(id) => {
                if self.board.can_mark_complete(&id) {
                    vec![Effect::CompleteOrder(id)]
                } else {
                    Vec::new()
                }
            }
            AppEvent::MarkCompleteSettled(Ok(_)) => {
                // The board is not flipped here; the live feed confirms the
                // new status with its next delivery.
                vec![Effect::Notify(Notice::Info(
                    "order completed, enjoy your meal".to_string(),
                ))]
            }
            AppEvent::MarkCompleteSettled(Err(reason)) => {
                vec![Effect::Notify(Notice::Error(format!(
                    "could not complete the order: {reason}"
                )))]
            }
            AppEvent::Navigate(view) => {
                self.navigate(view);
                Vec::new()
            }
            AppEvent::Back => {
                if let Some(previous) = self.history.pop() {
                    self.view = previous;
                }
                Vec::new()
            }
        }
    }

    fn navigate(&mut self, view: View) {
        if self.view != view {
            self.history.push(std::mem::replace(&mut self.view, view));
        }
    }

    fn checkout(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let Some(profile) = &self.profile else {
            return vec![Effect::Notify(Notice::Error(
                "sign in to place an order".to_string(),
            ))];
        };
        if self.checkout_pending {
            // Duplicate submission before the first attempt settled.
            return vec![Effect::Notify(Notice::Info(
                "checkout already in progress".to_string(),
            ))];
        }
        if self.cart.is_empty() {
            // Short-circuit: no write, no navigation.
            return Vec::new();
        }

        let seq = &mut self.order_seq;
        let next_id = move || {
            *seq += 1;
            OrderId::new(format!("order_{}_{}", now.timestamp_millis(), *seq))
        };
        let orders = materialize(&self.cart, profile, self.mode, now, next_id);

        self.checkout_pending = true;
        vec![Effect::PlaceOrders(orders)]
    }
}
