use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plaza_core::{Address, StoreError};
use plaza_order::repository::OrderQueryRepository;
use plaza_order::views::{OrderLineView, OrderView, SimpleOrderView};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Direct-to-DTO projections: view records are built straight from the
/// selected columns. Narrower payloads than the aggregate loads, but the view
/// shape leaks into the repository.
pub struct PgOrderQueryRepository {
    pool: PgPool,
}

impl PgOrderQueryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderViewRow {
    order_id: Uuid,
    member_name: String,
    order_date: DateTime<Utc>,
    status: String,
    city: String,
    street: String,
    zipcode: String,
}

#[derive(sqlx::FromRow)]
struct LineViewRow {
    order_id: Uuid,
    item_name: String,
    order_price: i32,
    count: i32,
}

impl OrderViewRow {
    fn into_view(self, order_items: Vec<OrderLineView>) -> Result<OrderView, StoreError> {
        Ok(OrderView {
            order_id: self.order_id,
            member_name: self.member_name,
            order_date: self.order_date,
            order_status: self.status.parse().map_err(StoreError::backend)?,
            address: Address {
                city: self.city,
                street: self.street,
                zipcode: self.zipcode,
            },
            order_items,
        })
    }

    fn into_simple_view(self) -> Result<SimpleOrderView, StoreError> {
        Ok(SimpleOrderView {
            order_id: self.order_id,
            member_name: self.member_name,
            order_date: self.order_date,
            order_status: self.status.parse().map_err(StoreError::backend)?,
            address: Address {
                city: self.city,
                street: self.street,
                zipcode: self.zipcode,
            },
        })
    }
}

impl LineViewRow {
    fn into_line(self) -> OrderLineView {
        OrderLineView {
            item_name: self.item_name,
            order_price: self.order_price,
            count: self.count,
        }
    }
}

const VIEW_SELECT: &str =
    "SELECT o.id AS order_id, m.name AS member_name, o.order_date, o.status, \
     d.city, d.street, d.zipcode \
     FROM orders o \
     JOIN members m ON m.id = o.member_id \
     JOIN deliveries d ON d.order_id = o.id \
     ORDER BY o.order_date DESC, o.id ASC";

const LINE_SELECT: &str =
    "SELECT oi.order_id, i.name AS item_name, oi.order_price, oi.count \
     FROM order_items oi \
     JOIN items i ON i.id = oi.item_id";

impl PgOrderQueryRepository {
    async fn find_roots(&self) -> Result<Vec<OrderViewRow>, StoreError> {
        sqlx::query_as(VIEW_SELECT)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}

#[async_trait]
impl OrderQueryRepository for PgOrderQueryRepository {
    async fn find_order_views(&self) -> Result<Vec<OrderView>, StoreError> {
        let roots = self.find_roots().await?;

        // One line query per order: root 1, collection N.
        let mut views = Vec::with_capacity(roots.len());
        for root in roots {
            let sql = format!("{LINE_SELECT} WHERE oi.order_id = $1 ORDER BY oi.id");
            let lines: Vec<LineViewRow> = sqlx::query_as(&sql)
                .bind(root.order_id)
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::backend)?;
            views.push(root.into_view(lines.into_iter().map(LineViewRow::into_line).collect())?);
        }
        Ok(views)
    }

    async fn find_order_views_batched(&self) -> Result<Vec<OrderView>, StoreError> {
        let roots = self.find_roots().await?;
        let order_ids: Vec<Uuid> = roots.iter().map(|r| r.order_id).collect();

        // Root 1, collection 1: a single grouped IN-style query, attached via
        // an order-id map in O(1) per order.
        let sql = format!("{LINE_SELECT} WHERE oi.order_id = ANY($1) ORDER BY oi.id");
        let lines: Vec<LineViewRow> = sqlx::query_as(&sql)
            .bind(&order_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        let mut by_order: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
        for line in lines {
            by_order
                .entry(line.order_id)
                .or_default()
                .push(line.into_line());
        }

        roots
            .into_iter()
            .map(|root| {
                let lines = by_order.remove(&root.order_id).unwrap_or_default();
                root.into_view(lines)
            })
            .collect()
    }

    async fn find_simple_order_views(&self) -> Result<Vec<SimpleOrderView>, StoreError> {
        let roots = self.find_roots().await?;
        roots.into_iter().map(OrderViewRow::into_simple_view).collect()
    }
}
