use async_trait::async_trait;
use chrono::{DateTime, Utc};
use plaza_core::{Address, StoreError};
use plaza_order::models::{Delivery, Order, OrderHead, OrderItem};
use plaza_order::repository::OrderRepository;
use plaza_order::search::{OrderSearch, MAX_SEARCH_RESULTS};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    member_id: Uuid,
    status: String,
    order_date: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct DeliveryRow {
    id: Uuid,
    status: String,
    city: String,
    street: String,
    zipcode: String,
}

#[derive(sqlx::FromRow)]
struct LineRow {
    id: Uuid,
    order_id: Uuid,
    item_id: Uuid,
    item_name: String,
    order_price: i32,
    count: i32,
}

/// One row of the full fetch-join: order x member x delivery x line x item.
#[derive(sqlx::FromRow)]
struct OrderJoinRow {
    order_id: Uuid,
    member_id: Uuid,
    member_name: String,
    status: String,
    order_date: DateTime<Utc>,
    delivery_id: Uuid,
    delivery_status: String,
    city: String,
    street: String,
    zipcode: String,
    line_id: Uuid,
    item_id: Uuid,
    item_name: String,
    order_price: i32,
    count: i32,
}

/// One row of the to-one join: order x member x delivery, no lines.
#[derive(sqlx::FromRow)]
struct OrderHeadRow {
    id: Uuid,
    member_id: Uuid,
    member_name: String,
    status: String,
    order_date: DateTime<Utc>,
    delivery_id: Uuid,
    delivery_status: String,
    city: String,
    street: String,
    zipcode: String,
}

impl OrderHeadRow {
    fn into_head(self) -> Result<OrderHead, StoreError> {
        Ok(OrderHead {
            id: self.id,
            member_id: self.member_id,
            member_name: self.member_name,
            order_date: self.order_date,
            status: self.status.parse().map_err(StoreError::backend)?,
            delivery: Delivery {
                id: self.delivery_id,
                status: self.delivery_status.parse().map_err(StoreError::backend)?,
                address: Address {
                    city: self.city,
                    street: self.street,
                    zipcode: self.zipcode,
                },
            },
        })
    }
}

impl LineRow {
    fn into_item(self) -> OrderItem {
        OrderItem {
            id: self.id,
            item_id: self.item_id,
            item_name: self.item_name,
            order_price: self.order_price,
            count: self.count,
        }
    }
}

const HEAD_SELECT: &str = "SELECT o.id, o.member_id, m.name AS member_name, o.status, o.order_date, \
     d.id AS delivery_id, d.status AS delivery_status, d.city, d.street, d.zipcode \
     FROM orders o \
     JOIN members m ON m.id = o.member_id \
     JOIN deliveries d ON d.order_id = o.id";

impl PgOrderRepository {
    /// Batch-load the line collections for a set of orders with one grouped
    /// query, keyed by order id.
    async fn load_lines_for(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderItem>>, StoreError> {
        let rows: Vec<LineRow> = sqlx::query_as(
            "SELECT oi.id, oi.order_id, oi.item_id, i.name AS item_name, oi.order_price, oi.count \
             FROM order_items oi \
             JOIN items i ON i.id = oi.item_id \
             WHERE oi.order_id = ANY($1) \
             ORDER BY oi.id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row.into_item());
        }
        Ok(by_order)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &Order) -> Result<Uuid, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        // Guarded decrement: the WHERE clause is the availability check, so a
        // concurrent placement that would oversell affects zero rows.
        for line in &order.items {
            let result = sqlx::query(
                "UPDATE items SET stock_quantity = stock_quantity - $1 \
                 WHERE id = $2 AND stock_quantity >= $1",
            )
            .bind(line.count)
            .bind(line.item_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

            if result.rows_affected() == 0 {
                let available: Option<i32> =
                    sqlx::query_scalar("SELECT stock_quantity FROM items WHERE id = $1")
                        .bind(line.item_id)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(StoreError::backend)?;
                return Err(match available {
                    Some(available) => StoreError::OutOfStock {
                        requested: line.count,
                        available,
                    },
                    None => StoreError::NotFound(format!("item {}", line.item_id)),
                });
            }
        }

        sqlx::query("INSERT INTO orders (id, member_id, status, order_date) VALUES ($1, $2, $3, $4)")
            .bind(order.id)
            .bind(order.member_id)
            .bind(order.status.as_str())
            .bind(order.order_date)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        sqlx::query(
            "INSERT INTO deliveries (id, order_id, status, city, street, zipcode) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(order.delivery.id)
        .bind(order.id)
        .bind(order.delivery.status.as_str())
        .bind(&order.delivery.address.city)
        .bind(&order.delivery.address.street)
        .bind(&order.delivery.address.zipcode)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::backend)?;

        for line in &order.items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, item_id, order_price, count) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(line.id)
            .bind(order.id)
            .bind(line.item_id)
            .bind(line.order_price)
            .bind(line.count)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)?;
        Ok(order.id)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        let order_row: Option<OrderRow> =
            sqlx::query_as("SELECT id, member_id, status, order_date FROM orders WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        let Some(row) = order_row else {
            return Ok(None);
        };

        let member_name: String = sqlx::query_scalar("SELECT name FROM members WHERE id = $1")
            .bind(row.member_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        let delivery_row: DeliveryRow = sqlx::query_as(
            "SELECT id, status, city, street, zipcode FROM deliveries WHERE order_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let line_rows: Vec<LineRow> = sqlx::query_as(
            "SELECT oi.id, oi.order_id, oi.item_id, i.name AS item_name, oi.order_price, oi.count \
             FROM order_items oi \
             JOIN items i ON i.id = oi.item_id \
             WHERE oi.order_id = $1 \
             ORDER BY oi.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(Some(Order {
            id: row.id,
            member_id: row.member_id,
            member_name,
            order_date: row.order_date,
            status: row.status.parse().map_err(StoreError::backend)?,
            delivery: Delivery {
                id: delivery_row.id,
                status: delivery_row.status.parse().map_err(StoreError::backend)?,
                address: Address {
                    city: delivery_row.city,
                    street: delivery_row.street,
                    zipcode: delivery_row.zipcode,
                },
            },
            items: line_rows.into_iter().map(LineRow::into_item).collect(),
        }))
    }

    async fn cancel(&self, id: Uuid) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::backend)?;

        // Row lock so a racing cancel observes the committed status.
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(StoreError::backend)?;

        match status.as_deref() {
            None => return Err(StoreError::NotFound(format!("order {id}"))),
            Some("CANCELED") => return Err(StoreError::AlreadyCanceled(id)),
            Some(_) => {}
        }

        sqlx::query("UPDATE orders SET status = 'CANCELED' WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::backend)?;

        let lines: Vec<(Uuid, i32)> =
            sqlx::query_as("SELECT item_id, count FROM order_items WHERE order_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await
                .map_err(StoreError::backend)?;

        for (item_id, count) in lines {
            sqlx::query("UPDATE items SET stock_quantity = stock_quantity + $1 WHERE id = $2")
                .bind(count)
                .bind(item_id)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::backend)?;
        }

        tx.commit().await.map_err(StoreError::backend)?;

        self.find(id)
            .await?
            .ok_or_else(|| StoreError::backend(format!("order {id} missing after cancel")))
    }

    async fn search(&self, filter: &OrderSearch) -> Result<Vec<Order>, StoreError> {
        // Compose the clause from zero, one, or two predicates.
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT o.id FROM orders o JOIN members m ON m.id = o.member_id",
        );
        let mut has_where = false;

        if let Some(status) = filter.status {
            qb.push(" WHERE o.status = ");
            qb.push_bind(status.as_str());
            has_where = true;
        }
        if let Some(name) = filter.member_name_filter() {
            qb.push(if has_where { " AND " } else { " WHERE " });
            qb.push("m.name LIKE ");
            qb.push_bind(format!("%{name}%"));
        }
        qb.push(" ORDER BY o.order_date DESC, o.id ASC LIMIT ");
        qb.push_bind(MAX_SEARCH_RESULTS as i64);

        let ids: Vec<Uuid> = qb
            .build_query_scalar()
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        // Deliberately naive: each aggregate is materialized with its own
        // association queries (1 + N round trips).
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.find(id).await? {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    async fn find_all_with_items(&self) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<OrderJoinRow> = sqlx::query_as(
            "SELECT o.id AS order_id, o.member_id, m.name AS member_name, o.status, o.order_date, \
             d.id AS delivery_id, d.status AS delivery_status, d.city, d.street, d.zipcode, \
             oi.id AS line_id, oi.item_id, i.name AS item_name, oi.order_price, oi.count \
             FROM orders o \
             JOIN members m ON m.id = o.member_id \
             JOIN deliveries d ON d.order_id = o.id \
             JOIN order_items oi ON oi.order_id = o.id \
             JOIN items i ON i.id = oi.item_id \
             ORDER BY o.order_date DESC, o.id ASC, oi.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        // The to-many join repeats each order once per line; collapse the
        // duplicates by order id while keeping row order.
        let mut orders: Vec<Order> = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::new();
        for row in rows {
            let line = OrderItem {
                id: row.line_id,
                item_id: row.item_id,
                item_name: row.item_name,
                order_price: row.order_price,
                count: row.count,
            };
            match index.get(&row.order_id) {
                Some(&i) => orders[i].items.push(line),
                None => {
                    index.insert(row.order_id, orders.len());
                    orders.push(Order {
                        id: row.order_id,
                        member_id: row.member_id,
                        member_name: row.member_name,
                        order_date: row.order_date,
                        status: row.status.parse().map_err(StoreError::backend)?,
                        delivery: Delivery {
                            id: row.delivery_id,
                            status: row.delivery_status.parse().map_err(StoreError::backend)?,
                            address: Address {
                                city: row.city,
                                street: row.street,
                                zipcode: row.zipcode,
                            },
                        },
                        items: vec![line],
                    });
                }
            }
        }
        Ok(orders)
    }

    async fn find_all_paged(&self, offset: i64, limit: i64) -> Result<Vec<Order>, StoreError> {
        let sql = format!("{HEAD_SELECT} ORDER BY o.order_date DESC, o.id ASC LIMIT $1 OFFSET $2");
        let head_rows: Vec<OrderHeadRow> = sqlx::query_as(&sql)
            .bind(limit.max(0))
            .bind(offset.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        let mut heads = Vec::with_capacity(head_rows.len());
        for row in head_rows {
            heads.push(row.into_head()?);
        }

        let ids: Vec<Uuid> = heads.iter().map(|h| h.id).collect();
        let mut lines = self.load_lines_for(&ids).await?;

        Ok(heads
            .into_iter()
            .map(|head| {
                let items = lines.remove(&head.id).unwrap_or_default();
                head.into_order(items)
            })
            .collect())
    }

    async fn find_heads(&self) -> Result<Vec<OrderHead>, StoreError> {
        let sql = format!("{HEAD_SELECT} ORDER BY o.order_date DESC, o.id ASC");
        let rows: Vec<OrderHeadRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        rows.into_iter().map(OrderHeadRow::into_head).collect()
    }

    async fn order_ids_by_member(&self, member_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        sqlx::query_scalar(
            "SELECT id FROM orders WHERE member_id = $1 ORDER BY order_date DESC, id ASC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)
    }
}
