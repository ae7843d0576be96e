//! # Checkout Materialization
//!
//! Converts the cart into one `Paid` order per distinct canteen. The pure
//! part lives here; submission, the in-flight guard, and cart clearing are
//! the session's job so a failed atomic commit leaves the cart exactly as it
//! was.

use crate::cart::Cart;
use crate::model::{EatingMode, Order, OrderId, OrderItem, OrderStatus, Profile};
use chrono::{DateTime, Utc};

/// Builds one order per canteen represented in the cart, preserving the
/// first-appearance order of canteens.
///
/// Each order's total is the sum of price x quantity over its own lines
/// only; the cart-level gateway and platform fees are not apportioned into
/// the persisted orders.
pub fn materialize(
    cart: &Cart,
    profile: &Profile,
    mode: EatingMode,
    now: DateTime<Utc>,
    mut next_id: impl FnMut() -> OrderId,
) -> Vec<Order> {
    cart.group_by_canteen()
        .into_iter()
        .map(|(canteen_id, lines)| {
            let items: Vec<OrderItem> = lines
                .iter()
                .map(|line| OrderItem {
                    name: line.dish.name.clone(),
                    price: line.dish.price,
                    quantity: line.quantity,
                    veg: line.dish.veg,
                })
                .collect();
            let total = lines.iter().map(|line| line.line_total()).sum();
            Order {
                id: next_id(),
                user_id: profile.uid.clone(),
                member_code: profile.member_code.clone(),
                canteen_id,
                canteen_name: lines[0].dish.canteen_name.clone(),
                items,
                total,
                mode,
                status: OrderStatus::Paid,
                created_at: now,
            }
        })
        .collect()
}
