//! # Order Tracking
//!
//! Presents the live status of today's orders, split into current and past.
//! The board is rebuilt wholesale from every feed delivery; it never mutates
//! an order locally, so the display only changes when the store confirms a
//! change.

use crate::model::{Order, OrderId, OrderStatus};
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};

/// Start of the current calendar day in local time, as a UTC instant — the
/// cutoff for the tracking feed.
pub fn start_of_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight fell into a DST gap; the earliest representable local
        // time today is `now` itself.
        None => now.with_timezone(&Utc),
    }
}

/// Today's orders, newest first, split by completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBoard {
    current: Vec<Order>,
    past: Vec<Order>,
}

impl OrderBoard {
    /// Rebuilds the board from a feed snapshot.
    ///
    /// Sorting is a stable total order: descending by creation time, ties
    /// broken by ascending id, so batched deliveries with equal timestamps
    /// always render in the same order.
    pub fn from_snapshot(mut orders: Vec<Order>) -> Self {
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        let (past, current) = orders
            .into_iter()
            .partition(|o| o.status == OrderStatus::Completed);
        Self { current, past }
    }

    pub fn current(&self) -> &[Order] {
        &self.current
    }

    pub fn past(&self) -> &[Order] {
        &self.past
    }

    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.current
            .iter()
            .chain(self.past.iter())
            .find(|o| &o.id == id)
    }

    /// The receipt-confirmation control is shown only while the owner has
    /// verified the order and the user has not yet confirmed.
    pub fn can_mark_complete(&self, id: &OrderId) -> bool {
        self.find(id)
            .is_some_and(|o| o.status == OrderStatus::VerifiedByOwner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanteenId, EatingMode, OrderItem, ShortCode, UserId};
    use chrono::{Duration, TimeZone};

    fn order(id: &str, status: OrderStatus, created_at: DateTime<Utc>) -> Order {
        Order {
            id: OrderId::new(id),
            user_id: UserId::new("uid-1"),
            member_code: ShortCode::generate(&mut rand::thread_rng()),
            canteen_id: CanteenId::new("c1"),
            canteen_name: "Udupi Corner".to_string(),
            items: vec![OrderItem {
                name: "Dosa".to_string(),
                price: 50.0,
                quantity: 1,
                veg: true,
            }],
            total: 50.0,
            mode: EatingMode::DineIn,
            status,
            created_at,
        }
    }

    #[test]
    fn board_splits_and_sorts_newest_first() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let board = OrderBoard::from_snapshot(vec![
            order("o1", OrderStatus::Paid, noon),
            order("o2", OrderStatus::Completed, noon - Duration::hours(2)),
            order("o3", OrderStatus::Ready, noon + Duration::hours(1)),
        ]);

        let current: Vec<_> = board.current().iter().map(|o| o.id.0.as_str()).collect();
        assert_eq!(current, vec!["o3", "o1"]);

        let past: Vec<_> = board.past().iter().map(|o| o.id.0.as_str()).collect();
        assert_eq!(past, vec!["o2"]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_id() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let board = OrderBoard::from_snapshot(vec![
            order("o9", OrderStatus::Paid, noon),
            order("o1", OrderStatus::Paid, noon),
            order("o5", OrderStatus::Paid, noon),
        ]);
        let ids: Vec<_> = board.current().iter().map(|o| o.id.0.as_str()).collect();
        assert_eq!(ids, vec!["o1", "o5", "o9"]);
    }

    #[test]
    fn mark_complete_is_offered_only_when_verified() {
        let noon = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let board = OrderBoard::from_snapshot(vec![
            order("o1", OrderStatus::Paid, noon),
            order("o2", OrderStatus::VerifiedByOwner, noon),
            order("o3", OrderStatus::Completed, noon),
        ]);

        assert!(!board.can_mark_complete(&OrderId::new("o1")));
        assert!(board.can_mark_complete(&OrderId::new("o2")));
        assert!(!board.can_mark_complete(&OrderId::new("o3")));
        assert!(!board.can_mark_complete(&OrderId::new("missing")));
    }

    #[test]
    fn start_of_day_is_local_midnight() {
        let local = Local.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap();
        let cutoff = start_of_day(local);
        let back = cutoff.with_timezone(&Local);
        assert_eq!(back.date_naive(), local.date_naive());
        assert_eq!(back.time(), NaiveTime::MIN);
    }
}
