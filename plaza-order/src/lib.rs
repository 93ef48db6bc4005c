pub mod models;
pub mod repository;
pub mod search;
pub mod service;
pub mod views;

pub use models::{Delivery, DeliveryStatus, Order, OrderHead, OrderItem, OrderStatus};
pub use repository::{ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository};
pub use search::OrderSearch;
pub use service::OrderService;
pub use views::{OrderLineView, OrderView, SimpleOrderView};
