//! Scripted demo of the full ordering workflow: sign in, browse the live
//! catalog, fill a cart across two canteens, check out, let the fulfillment
//! side advance both orders, and confirm receipt.
//!
//! Run with `RUST_LOG=info cargo run` (or `debug` for every dispatched
//! event).

use chrono::Local;
use food_arena::app::AppEvent;
use food_arena::auth::StaticAuth;
use food_arena::lifecycle::{setup_tracing, FoodArena};
use food_arena::model::{
    AllCanteens, Canteen, CanteenId, Dish, DishId, EatingMode, OrderPatch, OrderStatus,
};
use food_arena::session::Session;
use feed_store::Subscription;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting the food arena demo");
    let arena = FoodArena::start();

    seed_canteens(&arena).await?;

    let mut session = Session::new(arena.profiles.clone(), arena.orders.clone());
    let auth = StaticAuth::new("uid-alice", "Alice", "alice@example.com");

    let span = tracing::info_span!("sign_in");
    async {
        session.sign_in(&auth).await;
        info!("Signed in");
    }
    .instrument(span)
    .await;

    // Live feeds: the whole catalog, and today's orders of this user.
    let mut catalog_feed = arena
        .canteens
        .subscribe(AllCanteens)
        .await
        .map_err(|e| e.to_string())?;
    let filter = session
        .today_filter(Local::now())
        .ok_or("sign-in did not produce a profile")?;
    let mut order_feed = arena
        .orders
        .subscribe(filter)
        .await
        .map_err(|e| e.to_string())?;

    let snapshot = latest(&mut catalog_feed).await.ok_or("catalog feed ended")?;
    session.dispatch(AppEvent::CatalogSnapshot(snapshot)).await;
    info!(
        canteens = session.state.catalog.open_canteens().len(),
        dishes = session.state.catalog.dishes().len(),
        "Catalog rendered"
    );

    let span = tracing::info_span!("build_cart");
    async {
        let dosa = session
            .state
            .catalog
            .find(&DishId::new("dosa"), &CanteenId::new("udupi"))
            .cloned()
            .ok_or("dosa is not on the menu")?;
        let tea = session
            .state
            .catalog
            .find(&DishId::new("tea"), &CanteenId::new("chai-point"))
            .cloned()
            .ok_or("tea is not on the menu")?;

        session.dispatch(AppEvent::AddToCart(dosa.clone())).await;
        session.dispatch(AppEvent::AddToCart(dosa)).await;
        session.dispatch(AppEvent::AddToCart(tea)).await;
        session
            .dispatch(AppEvent::EditNotes {
                line: 0,
                text: "extra chutney".to_string(),
            })
            .await;

        let totals = session.state.cart.totals();
        info!(
            subtotal = totals.subtotal,
            grand_total = totals.grand_total,
            "Cart ready"
        );
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("checkout");
    async {
        session.dispatch(AppEvent::SelectMode(EatingMode::Takeaway)).await;
        session.dispatch(AppEvent::CheckoutRequested).await;
        info!(notices = ?session.drain_notices(), "Checkout settled");
    }
    .instrument(span)
    .await;

    let snapshot = latest(&mut order_feed).await.ok_or("order feed ended")?;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;
    for order in session.state.board.current() {
        info!(id = %order.id, canteen = %order.canteen_name, total = order.total, status = %order.status, "Order placed");
    }

    // The fulfillment side moves both orders forward.
    let span = tracing::info_span!("fulfillment");
    async {
        let ids: Vec<_> = session
            .state
            .board
            .current()
            .iter()
            .map(|o| o.id.clone())
            .collect();
        for id in ids {
            arena
                .orders
                .patch(id.clone(), OrderPatch::Status(OrderStatus::Ready))
                .await
                .map_err(|e| e.to_string())?;
            arena
                .orders
                .patch(id, OrderPatch::Status(OrderStatus::VerifiedByOwner))
                .await
                .map_err(|e| e.to_string())?;
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let snapshot = latest(&mut order_feed).await.ok_or("order feed ended")?;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;

    // The user confirms receipt of the first verified order.
    if let Some(order) = session.state.board.current().first() {
        let id = order.id.clone();
        info!(%id, progress = ?order.status.progress(), "Confirming receipt");
        session.dispatch(AppEvent::MarkCompleteRequested(id)).await;
    }

    let snapshot = latest(&mut order_feed).await.ok_or("order feed ended")?;
    session.dispatch(AppEvent::OrdersSnapshot(snapshot)).await;
    info!(
        current = session.state.board.current().len(),
        past = session.state.board.past().len(),
        "Final board"
    );

    catalog_feed.stop();
    order_feed.stop();
    drop(session);
    arena.shutdown().await?;

    info!("Demo finished");
    Ok(())
}

async fn seed_canteens(arena: &FoodArena) -> Result<(), String> {
    let udupi = Canteen {
        id: CanteenId::new("udupi"),
        name: "Udupi Corner".to_string(),
        image: "udupi.png".to_string(),
        is_open: true,
        dishes: vec![
            Dish {
                id: DishId::new("dosa"),
                name: "Dosa".to_string(),
                price: 50.0,
                image: "dosa.png".to_string(),
                veg: true,
                is_available: None,
            },
            Dish {
                id: DishId::new("meals"),
                name: "South Indian Meals".to_string(),
                price: 120.0,
                image: "meals.png".to_string(),
                veg: true,
                is_available: Some(false),
            },
        ],
    };
    let chai_point = Canteen {
        id: CanteenId::new("chai-point"),
        name: "Chai Point".to_string(),
        image: "chai.png".to_string(),
        is_open: true,
        dishes: vec![Dish {
            id: DishId::new("tea"),
            name: "Tea".to_string(),
            price: 20.0,
            image: "tea.png".to_string(),
            veg: true,
            is_available: Some(true),
        }],
    };

    for canteen in [udupi, chai_point] {
        arena.canteens.put(canteen).await.map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Drains the feed down to its most recent delivery.
async fn latest<D>(feed: &mut Subscription<D>) -> Option<Vec<D>> {
    let mut snapshot = feed.next().await?;
    while let Some(newer) = feed.try_next() {
        snapshot = newer;
    }
    Some(snapshot)
}
