//! End-to-end workflow tests with real collection actors: browse, cart,
//! checkout, and status tracking all run against the live store.

use chrono::{Duration, Local, Utc};
use feed_store::Subscription;
use food_arena::app::{AppEvent, View};
use food_arena::auth::StaticAuth;
use food_arena::lifecycle::FoodArena;
use food_arena::model::{
    AllCanteens, Canteen, CanteenId, Dish, DishId, EatingMode, Order, OrderItem, OrderPatch,
    OrderStatus, ShortCode, UserId,
};
use food_arena::session::Session;

fn dish(id: &str, name: &str, price: f64) -> Dish {
    Dish {
        id: DishId::new(id),
        name: name.to_string(),
        price,
        image: String::new(),
        veg: true,
        is_available: None,
    }
}

fn canteen(id: &str, name: &str, dishes: Vec<Dish>) -> Canteen {
    Canteen {
        id: CanteenId::new(id),
        name: name.to_string(),
        image: String::new(),
        is_open: true,
        dishes,
    }
}

async fn seed(arena: &FoodArena) {
    arena
        .canteens
        .put(canteen("c1", "Udupi Corner", vec![dish("dosa", "Dosa", 50.0)]))
        .await
        .expect("failed to seed canteen c1");
    arena
        .canteens
        .put(canteen("c2", "Chai Point", vec![dish("tea", "Tea", 20.0)]))
        .await
        .expect("failed to seed canteen c2");
}

async fn signed_in_session(arena: &FoodArena) -> Session {
    let mut session = Session::new(arena.profiles.clone(), arena.orders.clone());
    let auth = StaticAuth::new("uid-alice", "Alice", "alice@example.com");
    session.sign_in(&auth).await;
    assert!(session.state.profile.is_some(), "sign-in must bootstrap a profile");
    session
}

async fn render_catalog(session: &mut Session, arena: &FoodArena) {
    let mut feed = arena
        .canteens
        .subscribe(AllCanteens)
        .await
        .expect("catalog subscribe failed");
    let snapshot = feed.next().await.expect("catalog feed ended");
    session.dispatch(AppEvent::CatalogSnapshot(snapshot)).await;
}

/// Drains the feed down to its most recent delivery.
async fn latest<D>(feed: &mut Subscription<D>) -> Vec<D> {
    let mut snapshot = feed.next().await.expect("feed ended");
    while let Some(newer) = feed.try_next() {
        snapshot = newer;
    }
    snapshot
}

#[tokio::test]
async fn checkout_splits_the_cart_into_per_canteen_orders() {
    let arena = FoodArena::start();
    seed(&arena).await;
    let mut session = signed_in_session(&arena).await;
    render_catalog(&mut session, &arena).await;

    let mut order_feed = arena
        .orders
        .subscribe(session.today_filter(Local::now()).expect("no profile"))
        .await
        .expect("order subscribe failed");
    assert!(latest(&mut order_feed).await.is_empty());

    let dosa = session
        .state
        .catalog
        .find(&DishId::new("dosa"), &CanteenId::new("c1"))
        .cloned()
        .expect("dosa missing from catalog");
    let tea = session
        .state
        .catalog
        .find(&DishId::new("tea"), &CanteenId::new("c2"))
        .cloned()
        .expect("tea missing from catalog");

    session.dispatch(AppEvent::AddToCart(dosa.clone())).await;
    session.dispatch(AppEvent::AddToCart(dosa)).await;
    session.dispatch(AppEvent::AddToCart(tea)).await;
    session.dispatch(AppEvent::SelectMode(EatingMode::Takeaway)).await;

    session.dispatch(AppEvent::CheckoutRequested).await;

    // The cart is cleared and the client lands on the tracking view.
    assert!(session.state.cart.is_empty());
    assert_eq!(session.state.view, View::Orders);

    // The live feed delivers exactly the two per-canteen orders.
    let snapshot = latest(&mut order_feed).await;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;
    let board = &session.state.board;
    assert_eq!(board.current().len(), 2);
    assert!(board.past().is_empty());

    let c1 = board
        .current()
        .iter()
        .find(|o| o.canteen_id == CanteenId::new("c1"))
        .expect("no order for c1");
    assert_eq!(c1.total, 100.0);
    assert_eq!(c1.items.len(), 1);
    assert_eq!(c1.items[0].name, "Dosa");
    assert_eq!(c1.items[0].quantity, 2);
    assert_eq!(c1.status, OrderStatus::Paid);
    assert_eq!(c1.mode, EatingMode::Takeaway);

    let c2 = board
        .current()
        .iter()
        .find(|o| o.canteen_id == CanteenId::new("c2"))
        .expect("no order for c2");
    assert_eq!(c2.total, 20.0);
    assert_eq!(c2.items[0].quantity, 1);

    drop(order_feed);
    drop(session);
    arena.shutdown().await.expect("shutdown failed");
}

#[tokio::test]
async fn externally_driven_statuses_flow_back_through_the_feed() {
    let arena = FoodArena::start();
    seed(&arena).await;
    let mut session = signed_in_session(&arena).await;
    render_catalog(&mut session, &arena).await;

    let mut order_feed = arena
        .orders
        .subscribe(session.today_filter(Local::now()).expect("no profile"))
        .await
        .expect("order subscribe failed");

    let dosa = session
        .state
        .catalog
        .find(&DishId::new("dosa"), &CanteenId::new("c1"))
        .cloned()
        .expect("dosa missing");
    session.dispatch(AppEvent::AddToCart(dosa)).await;
    session.dispatch(AppEvent::CheckoutRequested).await;

    let snapshot = latest(&mut order_feed).await;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;
    let id = session.state.board.current()[0].id.clone();
    assert_eq!(session.state.board.current()[0].status.progress(), [true, false, false]);

    // Before the owner verifies, the confirmation control is not offered and
    // requesting completion issues no patch. (If it had, the Ready patch
    // below would fail as a status regression.)
    session.dispatch(AppEvent::MarkCompleteRequested(id.clone())).await;
    assert_eq!(session.state.board.current()[0].status, OrderStatus::Paid);

    // The fulfillment side advances the order.
    arena
        .orders
        .patch(id.clone(), OrderPatch::Status(OrderStatus::Ready))
        .await
        .expect("patch to Ready failed");
    arena
        .orders
        .patch(id.clone(), OrderPatch::Status(OrderStatus::VerifiedByOwner))
        .await
        .expect("patch to VerifiedByOwner failed");

    let snapshot = latest(&mut order_feed).await;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;
    let order = &session.state.board.current()[0];
    assert_eq!(order.status, OrderStatus::VerifiedByOwner);
    assert_eq!(order.status.progress(), [true, true, false]);
    assert!(session.state.board.can_mark_complete(&id));

    // The user confirms receipt; the board flips only after the feed does.
    session.dispatch(AppEvent::MarkCompleteRequested(id.clone())).await;
    let snapshot = latest(&mut order_feed).await;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;

    assert!(session.state.board.current().is_empty());
    let done = &session.state.board.past()[0];
    assert_eq!(done.id, id);
    assert_eq!(done.status.progress(), [true, true, true]);
    assert!(!session.state.board.can_mark_complete(&id));
}

#[tokio::test]
async fn tracking_feed_excludes_yesterday_and_other_users() {
    let arena = FoodArena::start();
    let mut session = signed_in_session(&arena).await;
    let uid = session.state.profile.as_ref().map(|p| p.uid.clone()).expect("no profile");

    let make_order = |id: &str, owner: &UserId, offset: Duration| Order {
        id: food_arena::model::OrderId::new(id),
        user_id: owner.clone(),
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
        status: OrderStatus::Paid,
        created_at: Utc::now() + offset,
    };

    arena
        .orders
        .commit(vec![
            make_order("today", &uid, Duration::zero()),
            make_order("yesterday", &uid, -Duration::days(1)),
            make_order("other-user", &UserId::new("uid-bob"), Duration::zero()),
        ])
        .await
        .expect("seeding orders failed");

    let mut order_feed = arena
        .orders
        .subscribe(session.today_filter(Local::now()).expect("no profile"))
        .await
        .expect("order subscribe failed");
    let snapshot = latest(&mut order_feed).await;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;

    let ids: Vec<_> = session
        .state
        .board
        .current()
        .iter()
        .map(|o| o.id.0.as_str())
        .collect();
    assert_eq!(ids, vec!["today"]);
}
