use crate::models::{Order, OrderHead};
use crate::search::OrderSearch;
use crate::views::{OrderView, SimpleOrderView};
use async_trait::async_trait;
use plaza_catalog::Item;
use plaza_core::{Member, StoreError};
use uuid::Uuid;

/// Repository trait for the order aggregate. Every read returns fully
/// materialized data; there is no lazy loading. The strategy methods differ
/// only in how many round trips they spend materializing it.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new aggregate. Charges each line's stock inside the same
    /// transaction as the inserts; fails `OutOfStock` without side effects if
    /// any guard fails, so concurrent placements can never oversell.
    async fn create(&self, order: &Order) -> Result<Uuid, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Order>, StoreError>;

    /// Mark the order `CANCELED` and restore each line's stock, atomically.
    /// Fails `NotFound` for unknown ids and `AlreadyCanceled` for a second
    /// cancellation. Returns the updated aggregate.
    async fn cancel(&self, id: Uuid) -> Result<Order, StoreError>;

    /// Naive load: one root query for matching ids, then each aggregate
    /// materialized with its own association queries (the 1 + N shape).
    /// Kept as comparison material for the join/batch/projection strategies.
    async fn search(&self, filter: &OrderSearch) -> Result<Vec<Order>, StoreError>;

    /// Fetch-join load: a single statement joining members, deliveries, lines
    /// and items; the row multiplication from the to-many join is collapsed
    /// per order id in memory. One round trip, but no pagination.
    async fn find_all_with_items(&self) -> Result<Vec<Order>, StoreError>;

    /// Paged load: join only the to-one associations, apply offset/limit, then
    /// batch-load all line collections for the page with one grouped query.
    /// Two round trips, pagination preserved.
    async fn find_all_paged(&self, offset: i64, limit: i64) -> Result<Vec<Order>, StoreError>;

    /// To-one join only, no line collections.
    async fn find_heads(&self) -> Result<Vec<OrderHead>, StoreError>;

    /// Read-only lookup index replacing the member -> orders back-reference.
    async fn order_ids_by_member(&self, member_id: Uuid) -> Result<Vec<Uuid>, StoreError>;
}

/// Repository trait for direct-to-DTO projections: result records are built
/// straight from selected columns, never from loaded aggregates.
#[async_trait]
pub trait OrderQueryRepository: Send + Sync {
    /// One root projection query, then one line query per order.
    async fn find_order_views(&self) -> Result<Vec<OrderView>, StoreError>;

    /// One root projection query plus a single grouped line query, assembled
    /// via an order-id map so attachment is O(1) per order.
    async fn find_order_views_batched(&self) -> Result<Vec<OrderView>, StoreError>;

    /// To-one projection only.
    async fn find_simple_order_views(&self) -> Result<Vec<SimpleOrderView>, StoreError>;
}

/// Repository trait for catalog items. `update` is an explicit atomic write,
/// not implicit dirty-checking; write intent is visible at the call site and a
/// missing row fails `NotFound`.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn save(&self, item: &Item) -> Result<(), StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError>;

    async fn update(&self, item: &Item) -> Result<(), StoreError>;

    async fn list(&self) -> Result<Vec<Item>, StoreError>;
}

/// Repository trait for members
#[async_trait]
pub trait MemberRepository: Send + Sync {
    async fn save(&self, member: &Member) -> Result<(), StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Member>, StoreError>;
}
