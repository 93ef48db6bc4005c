use chrono::{DateTime, Utc};
use plaza_catalog::{CatalogError, Item};
use plaza_core::{Address, Member};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Order status in the lifecycle. `Canceled` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Ordered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDERED" => Ok(OrderStatus::Ordered),
            "CANCELED" => Ok(OrderStatus::Canceled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

/// Delivery status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Ready,
    Comp,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Ready => "READY",
            DeliveryStatus::Comp => "COMP",
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(DeliveryStatus::Ready),
            "COMP" => Ok(DeliveryStatus::Comp),
            other => Err(format!("unknown delivery status: {other}")),
        }
    }
}

/// Shipment record owned 1:1 by its order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub address: Address,
    pub status: DeliveryStatus,
}

impl Delivery {
    pub fn new(address: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            address,
            status: DeliveryStatus::Ready,
        }
    }
}

/// An order line: which item, at what price, how many. The item name is
/// materialized at construction/load time so no later lookup is needed to
/// render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub order_price: i32,
    pub count: i32,
}

impl OrderItem {
    /// The only way to build a line: charges the item's stock by `count` and
    /// snapshots its name and current price. The persistence layer re-runs the
    /// same guard atomically at commit time.
    pub fn charge(item: &mut Item, count: i32) -> Result<Self, CatalogError> {
        item.remove_stock(count)?;
        Ok(Self {
            id: Uuid::new_v4(),
            item_id: item.id,
            item_name: item.name.clone(),
            order_price: item.price,
            count,
        })
    }

    pub fn total_price(&self) -> i32 {
        self.order_price * self.count
    }
}

/// The order aggregate: one member, one delivery, one or more lines. Ownership
/// is one-directional: the order holds its lines and delivery, nothing points
/// back at it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery: Delivery,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn place(member: &Member, delivery: Delivery, items: Vec<OrderItem>) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id: member.id,
            member_name: member.name.clone(),
            order_date: Utc::now(),
            status: OrderStatus::Ordered,
            delivery,
            items,
        }
    }

    pub fn total_price(&self) -> i32 {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    pub fn mark_canceled(&mut self) {
        self.status = OrderStatus::Canceled;
    }
}

/// The to-one slice of an order: everything except the line collection.
/// Returned by reads that join members and deliveries but deliberately skip
/// `order_items` (the paged strategy fetches lines separately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHead {
    pub id: Uuid,
    pub member_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery: Delivery,
}

impl OrderHead {
    pub fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            member_id: self.member_id,
            member_name: self.member_name,
            order_date: self.order_date,
            status: self.status,
            delivery: self.delivery,
            items,
        }
    }
}
