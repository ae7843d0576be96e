//! # Food Arena
//!
//! A food-ordering client workflow: browse open canteens and their dishes,
//! build a cart, check out into per-canteen orders, and track order status
//! through a fixed lifecycle driven by the fulfillment side.
//!
//! ## Shape
//!
//! - **[model]** — the stored documents: [`Profile`](model::Profile),
//!   [`Canteen`](model::Canteen) (with embedded dishes), [`Order`](model::Order).
//! - **[catalog]** — flattens the nested canteen feed into queryable views.
//! - **[cart]** — the session-local cart and its display totals.
//! - **[checkout]** — materializes the cart into one `Paid` order per canteen.
//! - **[tracking]** — today's orders split into current and past.
//! - **[app]** — the reducer: one [`apply`](app::AppState::apply) call per
//!   event, effects out.
//! - **[session]** — executes effects against the store clients.
//! - **[auth]** — the identity-provider seam and profile bootstrap.
//! - **[lifecycle]** — actor wiring, shutdown, and tracing setup.
//!
//! Persistence and live feeds come from the `feed-store` crate; there is no
//! server-side logic here.

pub mod app;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod lifecycle;
pub mod model;
pub mod session;
pub mod tracking;
