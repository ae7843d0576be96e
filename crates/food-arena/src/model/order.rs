//! Persisted per-canteen order, created at checkout and progressed through a
//! fixed status lifecycle by the fulfillment side.

use crate::model::canteen::CanteenId;
use crate::model::profile::{ShortCode, UserId};
use chrono::{DateTime, Utc};
use feed_store::{Document, DocumentFilter};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fulfillment mode picked at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EatingMode {
    DineIn,
    Takeaway,
}

/// Linear order lifecycle. Transitions only ever move forward; `Ready` and
/// `VerifiedByOwner` are driven by the fulfillment side, `Completed` by
/// either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderStatus {
    Paid,
    Ready,
    VerifiedByOwner,
    Completed,
}

impl OrderStatus {
    /// The 3-step tracking checklist: preparing, verified, completed.
    /// Monotonically increasing along the lifecycle.
    pub fn progress(self) -> [bool; 3] {
        [
            true,
            self >= OrderStatus::Ready,
            self == OrderStatus::Completed,
        ]
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Paid => "Paid",
            OrderStatus::Ready => "Ready",
            OrderStatus::VerifiedByOwner => "VerifiedByOwner",
            OrderStatus::Completed => "Completed",
        };
        write!(f, "{label}")
    }
}

/// Item snapshot captured at checkout time, independent of later catalog
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub veg: bool,
}

/// One canteen's share of a checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub member_code: ShortCode,
    pub canteen_id: CanteenId,
    pub canteen_name: String,
    pub items: Vec<OrderItem>,
    /// Sum of price x quantity over this canteen's items only. Cart-level
    /// fees are deliberately not distributed into split orders.
    pub total: f64,
    pub mode: EatingMode,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order id must not be empty")]
    EmptyId,
    #[error("order has no items")]
    NoItems,
    #[error("order total {actual} does not match its items ({expected})")]
    TotalMismatch { expected: f64, actual: f64 },
    #[error("cannot move status backwards: {from} -> {to}")]
    StatusRegression { from: OrderStatus, to: OrderStatus },
}

/// The only mutation this side or the fulfillment side ever applies to a
/// stored order.
#[derive(Debug, Clone)]
pub enum OrderPatch {
    Status(OrderStatus),
}

/// Live-feed filter for the tracking view: the current user's orders placed
/// since some cutoff (start of the local day).
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub owner: UserId,
    pub since: DateTime<Utc>,
}

impl DocumentFilter<Order> for OrderFilter {
    fn matches(&self, doc: &Order) -> bool {
        doc.user_id == self.owner && doc.created_at >= self.since
    }
}

impl Document for Order {
    type Id = OrderId;
    type Patch = OrderPatch;
    type Filter = OrderFilter;
    type Error = OrderError;

    fn id(&self) -> OrderId {
        self.id.clone()
    }

    fn validate(&self) -> Result<(), OrderError> {
        if self.id.0.is_empty() {
            return Err(OrderError::EmptyId);
        }
        if self.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        let expected: f64 = self
            .items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum();
        if (expected - self.total).abs() > f64::EPSILON {
            return Err(OrderError::TotalMismatch {
                expected,
                actual: self.total,
            });
        }
        Ok(())
    }

    fn apply(&mut self, patch: OrderPatch) -> Result<(), OrderError> {
        match patch {
            OrderPatch::Status(next) => {
                if next < self.status {
                    return Err(OrderError::StatusRegression {
                        from: self.status,
                        to: next,
                    });
                }
                self.status = next;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(status: OrderStatus) -> Order {
        Order {
            id: OrderId::new("o1"),
            user_id: UserId::new("uid-1"),
            member_code: ShortCode::generate(&mut rand::thread_rng()),
            canteen_id: CanteenId::new("c1"),
            canteen_name: "Udupi Corner".to_string(),
            items: vec![OrderItem {
                name: "Dosa".to_string(),
                price: 50.0,
                quantity: 2,
                veg: true,
            }],
            total: 100.0,
            mode: EatingMode::DineIn,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn progress_checklist_follows_the_lifecycle() {
        assert_eq!(OrderStatus::Paid.progress(), [true, false, false]);
        assert_eq!(OrderStatus::Ready.progress(), [true, true, false]);
        assert_eq!(OrderStatus::VerifiedByOwner.progress(), [true, true, false]);
        assert_eq!(OrderStatus::Completed.progress(), [true, true, true]);
    }

    #[test]
    fn status_can_only_move_forward() {
        let mut o = order(OrderStatus::Ready);
        o.apply(OrderPatch::Status(OrderStatus::VerifiedByOwner))
            .unwrap();
        assert_eq!(o.status, OrderStatus::VerifiedByOwner);

        let result = o.apply(OrderPatch::Status(OrderStatus::Paid));
        assert!(matches!(result, Err(OrderError::StatusRegression { .. })));
        assert_eq!(o.status, OrderStatus::VerifiedByOwner);
    }

    #[test]
    fn total_must_match_item_lines() {
        let mut o = order(OrderStatus::Paid);
        assert!(o.validate().is_ok());
        o.total = 120.0;
        assert!(matches!(
            o.validate(),
            Err(OrderError::TotalMismatch { .. })
        ));
    }

    #[test]
    fn filter_selects_owner_and_cutoff() {
        let o = order(OrderStatus::Paid);
        let mut filter = OrderFilter {
            owner: UserId::new("uid-1"),
            since: Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap(),
        };
        assert!(filter.matches(&o));

        filter.since = Utc.with_ymd_and_hms(2024, 5, 11, 0, 0, 0).unwrap();
        assert!(!filter.matches(&o), "yesterday's order is filtered out");

        filter.since = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        filter.owner = UserId::new("uid-2");
        assert!(!filter.matches(&o), "someone else's order is filtered out");
    }
}
