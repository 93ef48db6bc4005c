pub mod item;

pub use item::{CatalogError, Item};
