use crate::model::{Canteen, Order, Profile};
use feed_store::{CollectionActor, CollectionClient};
use tracing::{error, info};

const CHANNEL_CAPACITY: usize = 32;

/// The running backend stand-in: one collection actor per document type.
///
/// Clients are cheap to clone; hand them to sessions and to whatever plays
/// the fulfillment side. `shutdown` consumes the arena, so drop any cloned
/// clients first or the actors will keep serving them.
pub struct FoodArena {
    pub profiles: CollectionClient<Profile>,
    pub canteens: CollectionClient<Canteen>,
    pub orders: CollectionClient<Order>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl FoodArena {
    pub fn start() -> Self {
        let (profile_actor, profiles) = CollectionActor::<Profile>::new(CHANNEL_CAPACITY);
        let (canteen_actor, canteens) = CollectionActor::<Canteen>::new(CHANNEL_CAPACITY);
        let (order_actor, orders) = CollectionActor::<Order>::new(CHANNEL_CAPACITY);

        let handles = vec![
            tokio::spawn(profile_actor.run()),
            tokio::spawn(canteen_actor.run()),
            tokio::spawn(order_actor.run()),
        ];

        info!("Food arena started");
        Self {
            profiles,
            canteens,
            orders,
            handles,
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down");
        drop(self.profiles);
        drop(self.canteens);
        drop(self.orders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Collection task failed");
                return Err(format!("collection task failed: {e:?}"));
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}
