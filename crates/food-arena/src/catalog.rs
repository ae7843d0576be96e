//! # Catalog Index
//!
//! Flattens the nested canteen feed into the two views the UI works from:
//! open canteens and available dishes tagged with their parent canteen.
//!
//! The index is rebuilt wholesale from every feed snapshot — no incremental
//! patching — so a render triggered with stale-then-fresh data converges on
//! the same result regardless of delivery order.

use crate::model::{Canteen, CanteenId, DishId};
use serde::{Deserialize, Serialize};

/// A dish flattened out of its parent canteen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishView {
    pub dish_id: DishId,
    pub canteen_id: CanteenId,
    pub canteen_name: String,
    pub name: String,
    pub price: f64,
    pub image: String,
    pub veg: bool,
}

/// An open canteen as shown on the arena page.
#[derive(Debug, Clone, PartialEq)]
pub struct CanteenSummary {
    pub id: CanteenId,
    pub name: String,
    pub image: String,
}

/// Flat, queryable view over one catalog feed snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogIndex {
    canteens: Vec<CanteenSummary>,
    dishes: Vec<DishView>,
}

impl CatalogIndex {
    /// Rebuilds the index from a feed snapshot.
    ///
    /// A canteen is included only while `is_open`; a dish only if its own
    /// availability flag is true or absent. Pure and idempotent: the same
    /// snapshot always produces the same index.
    pub fn rebuild(snapshot: &[Canteen]) -> Self {
        let mut canteens = Vec::new();
        let mut dishes = Vec::new();

        for canteen in snapshot.iter().filter(|c| c.is_open) {
            canteens.push(CanteenSummary {
                id: canteen.id.clone(),
                name: canteen.name.clone(),
                image: canteen.image.clone(),
            });
            for dish in canteen.dishes.iter().filter(|d| d.is_available()) {
                dishes.push(DishView {
                    dish_id: dish.id.clone(),
                    canteen_id: canteen.id.clone(),
                    canteen_name: canteen.name.clone(),
                    name: dish.name.clone(),
                    price: dish.price,
                    image: dish.image.clone(),
                    veg: dish.veg,
                });
            }
        }

        Self { canteens, dishes }
    }

    pub fn open_canteens(&self) -> &[CanteenSummary] {
        &self.canteens
    }

    pub fn dishes(&self) -> &[DishView] {
        &self.dishes
    }

    /// Menu of one canteen.
    pub fn dishes_of<'a>(&'a self, canteen: &'a CanteenId) -> impl Iterator<Item = &'a DishView> {
        self.dishes.iter().filter(move |d| &d.canteen_id == canteen)
    }

    /// Every canteen offering a dish of this name — the dish-detail page.
    pub fn offers_of<'a>(&'a self, dish_name: &'a str) -> impl Iterator<Item = &'a DishView> {
        self.dishes.iter().filter(move |d| d.name == dish_name)
    }

    pub fn find(&self, dish: &DishId, canteen: &CanteenId) -> Option<&DishView> {
        self.dishes
            .iter()
            .find(|d| &d.dish_id == dish && &d.canteen_id == canteen)
    }
}
