use crate::models::{Delivery, Order, OrderItem};
use crate::repository::{ItemRepository, MemberRepository, OrderRepository};
use plaza_core::StoreError;
use std::sync::Arc;
use uuid::Uuid;

/// Transactional order use-cases: placement and cancellation. Each call is one
/// request, one storage transaction, one task, no background work.
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    items: Arc<dyn ItemRepository>,
    members: Arc<dyn MemberRepository>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        items: Arc<dyn ItemRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        Self {
            orders,
            items,
            members,
        }
    }

    /// Place an order of `count` units of one item for a member, delivered to
    /// the member's address. The stock check here is a fast fail on a copy of
    /// the item; the authoritative guard runs inside the repository
    /// transaction, so two concurrent placements cannot both pass against the
    /// same pre-decrement stock.
    pub async fn place_order(
        &self,
        member_id: Uuid,
        item_id: Uuid,
        count: i32,
    ) -> Result<Uuid, StoreError> {
        if count <= 0 {
            return Err(StoreError::Invalid(format!(
                "order count must be positive, got {count}"
            )));
        }

        let member = self
            .members
            .find(member_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("member {member_id}")))?;
        let mut item = self
            .items
            .find(item_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("item {item_id}")))?;

        let line = OrderItem::charge(&mut item, count)?;
        let delivery = Delivery::new(member.address.clone());
        let order = Order::place(&member, delivery, vec![line]);

        let order_id = self.orders.create(&order).await?;
        tracing::info!(%order_id, %member_id, %item_id, count, "order placed");
        Ok(order_id)
    }

    /// Cancel an order, restoring each line's stock. A second cancellation is
    /// rejected with `AlreadyCanceled` rather than silently restocking twice.
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<Order, StoreError> {
        let order = self.orders.cancel(order_id).await?;
        tracing::info!(%order_id, "order canceled");
        Ok(order)
    }
}
