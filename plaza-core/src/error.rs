use plaza_catalog::CatalogError;
use uuid::Uuid;

/// Failure taxonomy shared by every repository and service. Business faults
/// (`NotFound`, `OutOfStock`, `AlreadyCanceled`, `Invalid`) are distinct so the
/// API layer can render them as 4xx responses; everything that goes wrong
/// inside a backend surfaces as `Backend`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Out of stock: requested {requested}, available {available}")]
    OutOfStock { requested: i32, available: i32 },

    #[error("Order already canceled: {0}")]
    AlreadyCanceled(Uuid),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Storage backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}

impl From<CatalogError> for StoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => Self::NotFound(format!("item {id}")),
            CatalogError::OutOfStock {
                requested,
                available,
            } => Self::OutOfStock {
                requested,
                available,
            },
        }
    }
}
