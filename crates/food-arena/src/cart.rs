//! # Cart Manager
//!
//! The session-local cart and its derived totals. Lines merge on the pair
//! (dish id, canteen id); a quantity stepped to zero or below removes the
//! line, so no negative-quantity state is representable.

use crate::catalog::DishView;
use crate::model::CanteenId;
use serde::{Deserialize, Serialize};

/// Flat fee charged by the payment gateway per cart, in display units.
pub const GATEWAY_FEE: f64 = 2.0;
/// Flat platform fee per cart, in display units.
pub const PLATFORM_FEE: f64 = 5.0;

/// One dish offering in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub dish: DishView,
    pub quantity: u32,
    pub notes: String,
}

impl CartLine {
    pub fn line_total(&self) -> f64 {
        self.dish.price * f64::from(self.quantity)
    }
}

/// Display-only totals for the whole cart.
///
/// Fees are a cart-level concept: they appear in the payment summary but are
/// never distributed into the split per-canteen orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub gateway_fee: f64,
    pub platform_fee: f64,
    pub grand_total: f64,
}

/// Session-scoped cart; lives only in memory until checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Adds one unit of a dish, merging with an existing line for the same
    /// (dish id, canteen id).
    pub fn add(&mut self, dish: DishView) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.dish.dish_id == dish.dish_id && l.dish.canteen_id == dish.canteen_id)
        {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                dish,
                quantity: 1,
                notes: String::new(),
            }),
        }
    }

    /// Steps a line's quantity by `delta`; a result of zero or below removes
    /// the line. Out-of-range indices are ignored.
    pub fn step_quantity(&mut self, line: usize, delta: i32) {
        let Some(entry) = self.lines.get_mut(line) else {
            return;
        };
        let next = i64::from(entry.quantity) + i64::from(delta);
        if next <= 0 {
            self.lines.remove(line);
        } else {
            entry.quantity = next as u32;
        }
    }

    /// Free-text replace of a line's notes; no validation.
    pub fn set_notes(&mut self, line: usize, text: impl Into<String>) {
        if let Some(entry) = self.lines.get_mut(line) {
            entry.notes = text.into();
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of units across all lines — the cart badge.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Subtotal across ALL lines regardless of canteen, plus flat fees when
    /// the cart is non-empty.
    pub fn totals(&self) -> CartTotals {
        let subtotal: f64 = self.lines.iter().map(CartLine::line_total).sum();
        let (gateway_fee, platform_fee) = if subtotal > 0.0 {
            (GATEWAY_FEE, PLATFORM_FEE)
        } else {
            (0.0, 0.0)
        };
        CartTotals {
            subtotal,
            gateway_fee,
            platform_fee,
            grand_total: subtotal + gateway_fee + platform_fee,
        }
    }

    /// Partitions lines by canteen, preserving first-appearance order.
    pub fn group_by_canteen(&self) -> Vec<(CanteenId, Vec<&CartLine>)> {
        let mut groups: Vec<(CanteenId, Vec<&CartLine>)> = Vec::new();
        for line in &self.lines {
            match groups.iter_mut().find(|(id, _)| id == &line.dish.canteen_id) {
                Some((_, lines)) => lines.push(line),
                None => groups.push((line.dish.canteen_id.clone(), vec![line])),
            }
        }
        groups
    }
}
