//! Canteen document with its embedded dish list, as delivered by the
//! catalog feed.

use feed_store::{Document, DocumentFilter};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier of a canteen (vendor stall).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanteenId(pub String);

impl CanteenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for CanteenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a dish within its canteen. The same dish name at two
/// canteens is two distinct offerings; identity for cart merging is the
/// pair (dish id, canteen id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(pub String);

impl DishId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Display for DishId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A menu item embedded in its canteen document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    /// Price in display units, non-negative.
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub veg: bool,
    /// Absent means available; only explicit `false` hides the dish.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl Dish {
    pub fn is_available(&self) -> bool {
        self.is_available.unwrap_or(true)
    }
}

/// A vendor stall and the dishes it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canteen {
    pub id: CanteenId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub is_open: bool,
    #[serde(default)]
    pub dishes: Vec<Dish>,
}

#[derive(Debug, thiserror::Error)]
pub enum CanteenError {
    #[error("canteen id must not be empty")]
    EmptyId,
    #[error("canteen name must not be empty")]
    EmptyName,
    #[error("dish {0} has a negative price")]
    NegativePrice(DishId),
    #[error("dish id must not be empty")]
    EmptyDishId,
}

/// Owner-driven updates to a canteen document.
#[derive(Debug, Clone)]
pub enum CanteenPatch {
    SetOpen(bool),
}

/// The catalog subscribes to the whole collection; open/closed filtering is
/// the catalog index's job so a reopening canteen shows up without a new
/// subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllCanteens;

impl DocumentFilter<Canteen> for AllCanteens {
    fn matches(&self, _doc: &Canteen) -> bool {
        true
    }
}

impl Document for Canteen {
    type Id = CanteenId;
    type Patch = CanteenPatch;
    type Filter = AllCanteens;
    type Error = CanteenError;

    fn id(&self) -> CanteenId {
        self.id.clone()
    }

    fn validate(&self) -> Result<(), CanteenError> {
        if self.id.0.is_empty() {
            return Err(CanteenError::EmptyId);
        }
        if self.name.is_empty() {
            return Err(CanteenError::EmptyName);
        }
        for dish in &self.dishes {
            if dish.id.0.is_empty() {
                return Err(CanteenError::EmptyDishId);
            }
            if dish.price < 0.0 {
                return Err(CanteenError::NegativePrice(dish.id.clone()));
            }
        }
        Ok(())
    }

    fn apply(&mut self, patch: CanteenPatch) -> Result<(), CanteenError> {
        match patch {
            CanteenPatch::SetOpen(open) => {
                self.is_open = open;
                Ok(())
            }
        }
    }
}
