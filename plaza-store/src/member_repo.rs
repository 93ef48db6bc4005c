use async_trait::async_trait;
use plaza_core::{Address, Member, StoreError};
use plaza_order::repository::MemberRepository;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    name: String,
    city: String,
    street: String,
    zipcode: String,
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn save(&self, member: &Member) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO members (id, name, city, street, zipcode) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(member.id)
        .bind(&member.name)
        .bind(&member.address.city)
        .bind(&member.address.street)
        .bind(&member.address.zipcode)
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Member>, StoreError> {
        let row: Option<MemberRow> =
            sqlx::query_as("SELECT id, name, city, street, zipcode FROM members WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        Ok(row.map(|row| Member {
            id: row.id,
            name: row.name,
            address: Address {
                city: row.city,
                street: row.street,
                zipcode: row.zipcode,
            },
        }))
    }
}
