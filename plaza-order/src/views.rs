use crate::models::OrderStatus;
use chrono::{DateTime, Utc};
use plaza_core::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One order line as a flat projection record, constructed straight from
/// selected columns rather than from a loaded aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderLineView {
    pub item_name: String,
    pub order_price: i32,
    pub count: i32,
}

/// Direct-to-DTO projection of an order with its line collection attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Address,
    pub order_items: Vec<OrderLineView>,
}

/// Projection of an order and its to-one associations only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleOrderView {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Address,
}
