pub mod error;
pub mod identity;

pub use error::StoreError;
pub use identity::{Address, Member};
