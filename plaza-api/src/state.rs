use plaza_order::repository::{
    ItemRepository, MemberRepository, OrderQueryRepository, OrderRepository,
};
use plaza_order::OrderService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub order_queries: Arc<dyn OrderQueryRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub order_service: Arc<OrderService>,
}

impl AppState {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        order_queries: Arc<dyn OrderQueryRepository>,
        items: Arc<dyn ItemRepository>,
        members: Arc<dyn MemberRepository>,
    ) -> Self {
        let order_service = Arc::new(OrderService::new(
            orders.clone(),
            items.clone(),
            members.clone(),
        ));
        Self {
            orders,
            order_queries,
            items,
            members,
            order_service,
        }
    }
}
