//! Checkout failure handling against a mocked store: a failed atomic commit
//! must leave the cart untouched and create nothing, and the identical
//! checkout must be retryable.

use feed_store::mock::MockCollection;
use feed_store::StoreError;
use food_arena::app::{AppEvent, Notice, View};
use food_arena::auth::StaticAuth;
use food_arena::catalog::DishView;
use food_arena::model::{CanteenId, DishId, Order, Profile};
use food_arena::session::Session;

fn dish(id: &str, canteen: &str, price: f64) -> DishView {
    DishView {
        dish_id: DishId::new(id),
        canteen_id: CanteenId::new(canteen),
        canteen_name: format!("Canteen {canteen}"),
        name: format!("Dish {id}"),
        price,
        image: String::new(),
        veg: true,
    }
}

/// A session backed entirely by mocks, signed in as a first-time user.
async fn mocked_session(
    profiles: &mut MockCollection<Profile>,
    orders: &MockCollection<Order>,
) -> Session {
    // First sign-in: no stored profile, then the freshly created one is put.
    profiles.expect_get().return_ok(None);
    profiles.expect_put().return_ok(());

    let mut session = Session::new(profiles.client(), orders.client());
    session
        .sign_in(&StaticAuth::new("uid-alice", "Alice", "alice@example.com"))
        .await;
    assert!(session.state.profile.is_some());
    session
}

#[tokio::test]
async fn failed_commit_leaves_the_cart_intact_and_is_retryable() {
    let mut profiles = MockCollection::<Profile>::new();
    let mut orders = MockCollection::<Order>::new();
    let mut session = mocked_session(&mut profiles, &orders).await;

    session.dispatch(AppEvent::AddToCart(dish("d1", "c1", 50.0))).await;
    session.dispatch(AppEvent::AddToCart(dish("d2", "c2", 20.0))).await;
    let cart_before = session.state.cart.clone();
    session.drain_notices();

    // First attempt: the atomic batch write fails.
    orders.expect_commit().return_err(StoreError::StoreClosed);
    session.dispatch(AppEvent::CheckoutRequested).await;

    assert_eq!(session.state.cart, cart_before, "cart must survive the failure");
    assert!(!session.state.checkout_pending, "guard resets on settlement");
    assert_ne!(session.state.view, View::Orders, "no navigation on failure");
    let notices = session.drain_notices();
    assert!(
        notices.iter().any(|n| matches!(n, Notice::Error(_))),
        "failure must be surfaced distinctly, got {notices:?}"
    );

    // Retry: the identical checkout succeeds.
    orders.expect_commit().return_ok(());
    session.dispatch(AppEvent::CheckoutRequested).await;

    assert!(session.state.cart.is_empty());
    assert_eq!(session.state.view, View::Orders);
    let notices = session.drain_notices();
    assert!(notices.iter().any(|n| matches!(n, Notice::Info(_))));

    profiles.verify();
    orders.verify();
}

#[tokio::test]
async fn empty_cart_checkout_never_touches_the_store() {
    let mut profiles = MockCollection::<Profile>::new();
    let orders = MockCollection::<Order>::new();
    let mut session = mocked_session(&mut profiles, &orders).await;

    let view_before = session.state.view.clone();
    session.dispatch(AppEvent::CheckoutRequested).await;

    assert_eq!(session.state.view, view_before);
    // No commit expectation was set; verify proves no write was attempted.
    orders.verify();
    profiles.verify();
}

#[tokio::test]
async fn mark_complete_failure_does_not_flip_the_display() {
    let mut profiles = MockCollection::<Profile>::new();
    let mut orders = MockCollection::<Order>::new();
    let mut session = mocked_session(&mut profiles, &orders).await;

    // Build a board with one verified order via a scripted feed.
    use chrono::Utc;
    use food_arena::model::{EatingMode, OrderId, OrderItem, OrderStatus, ShortCode, UserId};
    let verified = Order {
        id: OrderId::new("o1"),
        user_id: UserId::new("uid-alice"),
        member_code: ShortCode::generate(&mut rand::thread_rng()),
        canteen_id: CanteenId::new("c1"),
        canteen_name: "Canteen c1".to_string(),
        items: vec![OrderItem {
            name: "Dosa".to_string(),
            price: 50.0,
            quantity: 1,
            veg: true,
        }],
        total: 50.0,
        mode: EatingMode::DineIn,
        status: OrderStatus::VerifiedByOwner,
        created_at: Utc::now(),
    };
    session
        .dispatch(AppEvent::OrdersSnapshot(vec![verified.clone()]))
        .await;
    assert!(session.state.board.can_mark_complete(&verified.id));
    session.drain_notices();

    // The status write fails; the order must still read VerifiedByOwner.
    orders.expect_patch().return_err(StoreError::StoreClosed);
    session
        .dispatch(AppEvent::MarkCompleteRequested(verified.id.clone()))
        .await;

    let shown = session.state.board.find(&verified.id).expect("order vanished");
    assert_eq!(shown.status, OrderStatus::VerifiedByOwner);
    assert!(session
        .drain_notices()
        .iter()
        .any(|n| matches!(n, Notice::Error(_))));

    orders.verify();
    profiles.verify();
}
