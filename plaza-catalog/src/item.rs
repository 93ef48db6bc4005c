use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sellable product with a unit price and an on-hand stock count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub price: i32,
    pub stock_quantity: i32,
}

impl Item {
    pub fn new(name: impl Into<String>, price: i32, stock_quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            stock_quantity,
        }
    }

    /// Charge stock for an order line. Stock never goes negative: if the
    /// requested count exceeds what is on hand the item is left untouched.
    pub fn remove_stock(&mut self, count: i32) -> Result<(), CatalogError> {
        if count > self.stock_quantity {
            return Err(CatalogError::OutOfStock {
                requested: count,
                available: self.stock_quantity,
            });
        }
        self.stock_quantity -= count;
        Ok(())
    }

    /// Return stock previously charged by an order line (cancellation path)
    pub fn add_stock(&mut self, count: i32) {
        self.stock_quantity += count;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: i32, available: i32 },
}
