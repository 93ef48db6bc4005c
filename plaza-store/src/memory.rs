use async_trait::async_trait;
use plaza_catalog::Item;
use plaza_core::{Member, StoreError};
use plaza_order::models::{Order, OrderHead, OrderStatus};
use plaza_order::repository::{
    ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository,
};
use plaza_order::search::{OrderSearch, MAX_SEARCH_RESULTS};
use plaza_order::views::{OrderLineView, OrderView, SimpleOrderView};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    members: HashMap<Uuid, Member>,
    items: HashMap<Uuid, Item>,
    orders: HashMap<Uuid, Order>,
}

/// In-memory store backing tests and local development. One mutex over the
/// whole state stands in for the database transaction: a placement's
/// availability check and stock decrement happen under the same lock, so the
/// oversell guarantee matches the Postgres implementation.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn sorted_orders(inner: &Inner) -> Vec<Order> {
    let mut orders: Vec<Order> = inner.orders.values().cloned().collect();
    orders.sort_by(|a, b| {
        b.order_date
            .cmp(&a.order_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    orders
}

fn head_of(order: &Order) -> OrderHead {
    OrderHead {
        id: order.id,
        member_id: order.member_id,
        member_name: order.member_name.clone(),
        order_date: order.order_date,
        status: order.status,
        delivery: order.delivery.clone(),
    }
}

fn view_of(order: &Order) -> OrderView {
    OrderView {
        order_id: order.id,
        member_name: order.member_name.clone(),
        order_date: order.order_date,
        order_status: order.status,
        address: order.delivery.address.clone(),
        order_items: order
            .items
            .iter()
            .map(|line| OrderLineView {
                item_name: line.item_name.clone(),
                order_price: line.order_price,
                count: line.count,
            })
            .collect(),
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: &Order) -> Result<Uuid, StoreError> {
        let mut inner = self.lock();

        // Same referential check the database enforces with its FK constraint.
        if !inner.members.contains_key(&order.member_id) {
            return Err(StoreError::NotFound(format!("member {}", order.member_id)));
        }

        // Check every line before mutating any stock so a failed guard leaves
        // the store untouched.
        for line in &order.items {
            let item = inner
                .items
                .get(&line.item_id)
                .ok_or_else(|| StoreError::NotFound(format!("item {}", line.item_id)))?;
            if item.stock_quantity < line.count {
                return Err(StoreError::OutOfStock {
                    requested: line.count,
                    available: item.stock_quantity,
                });
            }
        }
        for line in &order.items {
            if let Some(item) = inner.items.get_mut(&line.item_id) {
                item.remove_stock(line.count)?;
            }
        }

        inner.orders.insert(order.id, order.clone());
        Ok(order.id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn cancel(&self, id: Uuid) -> Result<Order, StoreError> {
        let mut inner = self.lock();

        let order = inner
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        if order.status == OrderStatus::Canceled {
            return Err(StoreError::AlreadyCanceled(id));
        }

        for line in &order.items {
            if let Some(item) = inner.items.get_mut(&line.item_id) {
                item.add_stock(line.count);
            }
        }

        let order = inner
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("order {id}")))?;
        order.mark_canceled();
        Ok(order.clone())
    }

    async fn search(&self, filter: &OrderSearch) -> Result<Vec<Order>, StoreError> {
        let inner = self.lock();
        let mut orders: Vec<Order> = sorted_orders(&inner)
            .into_iter()
            .filter(|order| filter.matches(order))
            .collect();
        orders.truncate(MAX_SEARCH_RESULTS);
        Ok(orders)
    }

    async fn find_all_with_items(&self) -> Result<Vec<Order>, StoreError> {
        Ok(sorted_orders(&self.lock()))
    }

    async fn find_all_paged(&self, offset: i64, limit: i64) -> Result<Vec<Order>, StoreError> {
        Ok(sorted_orders(&self.lock())
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn find_heads(&self) -> Result<Vec<OrderHead>, StoreError> {
        Ok(sorted_orders(&self.lock()).iter().map(head_of).collect())
    }

    async fn order_ids_by_member(&self, member_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        Ok(sorted_orders(&self.lock())
            .into_iter()
            .filter(|order| order.member_id == member_id)
            .map(|order| order.id)
            .collect())
    }
}

#[async_trait]
impl OrderQueryRepository for MemoryStore {
    async fn find_order_views(&self) -> Result<Vec<OrderView>, StoreError> {
        Ok(sorted_orders(&self.lock()).iter().map(view_of).collect())
    }

    async fn find_order_views_batched(&self) -> Result<Vec<OrderView>, StoreError> {
        // Same result as the per-order variant; the round-trip difference only
        // exists against a real database.
        self.find_order_views().await
    }

    async fn find_simple_order_views(&self) -> Result<Vec<SimpleOrderView>, StoreError> {
        Ok(sorted_orders(&self.lock())
            .iter()
            .map(|order| SimpleOrderView {
                order_id: order.id,
                member_name: order.member_name.clone(),
                order_date: order.order_date,
                order_status: order.status,
                address: order.delivery.address.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn save(&self, item: &Item) -> Result<(), StoreError> {
        self.lock().items.insert(item.id, item.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        Ok(self.lock().items.get(&id).cloned())
    }

    async fn update(&self, item: &Item) -> Result<(), StoreError> {
        let mut inner = self.lock();
        match inner.items.get_mut(&item.id) {
            Some(existing) => {
                *existing = item.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("item {}", item.id))),
        }
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let mut items: Vec<Item> = self.lock().items.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn save(&self, member: &Member) -> Result<(), StoreError> {
        self.lock().members.insert(member.id, member.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Member>, StoreError> {
        Ok(self.lock().members.get(&id).cloned())
    }
}
