//! Document models stored in the feed store: user profiles, canteens with
//! their embedded dishes, and per-canteen orders.

pub mod canteen;
pub mod order;
pub mod profile;

pub use canteen::{AllCanteens, Canteen, CanteenError, CanteenId, CanteenPatch, Dish, DishId};
pub use order::{
    EatingMode, Order, OrderError, OrderFilter, OrderId, OrderItem, OrderPatch, OrderStatus,
};
pub use profile::{AllProfiles, Identity, Profile, ProfileError, ShortCode, UserId};
