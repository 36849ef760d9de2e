//! Cart Lines

use serde::{Deserialize, Serialize};

use crate::ids::{BranchId, FoodId};

/// Name shown for a line whose product could no longer be found in the catalog.
pub const DELETED_ITEM_NAME: &str = "<deleted item>";

/// A cart line enriched with catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Food identifier; unique within a cart.
    pub food_id: FoodId,

    /// Number of units, at least 1.
    pub quantity: u32,

    /// Branch the food is sold by.
    pub branch_id: BranchId,

    /// Unit price in minor units, looked up from the catalog at load time.
    pub price: u64,

    /// Display name.
    pub name: String,

    /// Product image path, when the catalog has one.
    pub image_url: Option<String>,
}

impl CartLine {
    /// A line whose product lookup failed: kept in the cart, priced at zero.
    pub fn placeholder(food_id: FoodId, quantity: u32, branch_id: BranchId) -> Self {
        Self {
            food_id,
            quantity,
            branch_id,
            price: 0,
            name: DELETED_ITEM_NAME.to_string(),
            image_url: None,
        }
    }

    /// Whether this line stands in for a product that no longer exists.
    pub fn is_placeholder(&self) -> bool {
        self.price == 0 && self.name == DELETED_ITEM_NAME
    }

    /// Price × quantity, or `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.quantity))
    }
}
