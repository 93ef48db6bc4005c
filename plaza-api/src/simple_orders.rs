use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use plaza_core::Address;
use plaza_order::models::{Order, OrderHead, OrderStatus};
use plaza_order::search::OrderSearch;
use plaza_order::views::SimpleOrderView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Order with only its to-one associations (member, delivery) resolved.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleOrderDto {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Address,
}

impl From<&Order> for SimpleOrderDto {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            member_name: order.member_name.clone(),
            order_date: order.order_date,
            order_status: order.status,
            address: order.delivery.address.clone(),
        }
    }
}

impl From<OrderHead> for SimpleOrderDto {
    fn from(head: OrderHead) -> Self {
        Self {
            order_id: head.id,
            member_name: head.member_name,
            order_date: head.order_date,
            order_status: head.status,
            address: head.delivery.address,
        }
    }
}

/// GET /api/v1/simple-orders
/// v1: expose the aggregates directly, line collections included even though
/// this view only needs the to-one side.
pub async fn simple_orders_v1(
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders.search(&OrderSearch::default()).await?;
    Ok(Json(orders))
}

/// GET /api/v2/simple-orders
/// v2: same naive loads mapped to to-one DTOs.
pub async fn simple_orders_v2(
    State(state): State<AppState>,
) -> Result<Json<Vec<SimpleOrderDto>>, AppError> {
    let orders = state.orders.search(&OrderSearch::default()).await?;
    Ok(Json(orders.iter().map(SimpleOrderDto::from).collect()))
}

/// GET /api/v3/simple-orders
/// v3: one join over the to-one associations only, mapped in the handler.
pub async fn simple_orders_v3(
    State(state): State<AppState>,
) -> Result<Json<Vec<SimpleOrderDto>>, AppError> {
    let heads = state.orders.find_heads().await?;
    Ok(Json(heads.into_iter().map(SimpleOrderDto::from).collect()))
}

/// GET /api/v4/simple-orders
/// v4: project the to-one view straight from selected columns.
pub async fn simple_orders_v4(
    State(state): State<AppState>,
) -> Result<Json<Vec<SimpleOrderView>>, AppError> {
    Ok(Json(state.order_queries.find_simple_order_views().await?))
}
