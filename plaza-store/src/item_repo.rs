use async_trait::async_trait;
use plaza_catalog::Item;
use plaza_core::StoreError;
use plaza_order::repository::ItemRepository;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    price: i32,
    stock_quantity: i32,
}

impl ItemRow {
    fn into_item(self) -> Item {
        Item {
            id: self.id,
            name: self.name,
            price: self.price,
            stock_quantity: self.stock_quantity,
        }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn save(&self, item: &Item) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO items (id, name, price, stock_quantity) VALUES ($1, $2, $3, $4)")
            .bind(item.id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.stock_quantity)
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Item>, StoreError> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, price, stock_quantity FROM items WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        Ok(row.map(ItemRow::into_item))
    }

    /// Explicit whole-row update; a missing row is a `NotFound`, not a silent
    /// no-op.
    async fn update(&self, item: &Item) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE items SET name = $1, price = $2, stock_quantity = $3 WHERE id = $4")
                .bind(&item.name)
                .bind(item.price)
                .bind(item.stock_quantity)
                .bind(item.id)
                .execute(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("item {}", item.id)));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Item>, StoreError> {
        let rows: Vec<ItemRow> =
            sqlx::query_as("SELECT id, name, price, stock_quantity FROM items ORDER BY name, id")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::backend)?;
        Ok(rows.into_iter().map(ItemRow::into_item).collect())
    }
}
