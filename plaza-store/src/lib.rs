pub mod app_config;
pub mod database;
pub mod item_repo;
pub mod member_repo;
pub mod memory;
pub mod order_query_repo;
pub mod order_repo;

pub use app_config::Config;
pub use database::DbClient;
pub use item_repo::PgItemRepository;
pub use member_repo::PgMemberRepository;
pub use memory::MemoryStore;
pub use order_query_repo::PgOrderQueryRepository;
pub use order_repo::PgOrderRepository;
