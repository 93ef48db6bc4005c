use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use plaza_core::Address;
use plaza_order::models::{Order, OrderStatus};
use plaza_order::search::OrderSearch;
use plaza_order::views::OrderView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppJson};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDto {
    pub order_id: Uuid,
    pub member_name: String,
    pub order_date: DateTime<Utc>,
    pub order_status: OrderStatus,
    pub address: Address,
    pub order_items: Vec<OrderItemDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub item_name: String,
    pub order_price: i32,
    pub count: i32,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            member_name: order.member_name.clone(),
            order_date: order.order_date,
            order_status: order.status,
            address: order.delivery.address.clone(),
            order_items: order
                .items
                .iter()
                .map(|line| OrderItemDto {
                    item_name: line.item_name.clone(),
                    order_price: line.order_price,
                    count: line.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub offset: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub member_id: Uuid,
    pub item_id: Uuid,
    pub count: i32,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MemberOrdersResponse {
    pub member_id: Uuid,
    pub order_ids: Vec<Uuid>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/orders
/// v1: expose the aggregates themselves. Simple, but the payload shape is the
/// storage shape, and each aggregate costs its own association queries.
pub async fn orders_v1(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders.search(&OrderSearch::default()).await?;
    Ok(Json(orders))
}

/// GET /api/v2/orders
/// v2: same naive loads as v1, mapped to DTOs in the handler. Better payload,
/// identical round-trip cost.
pub async fn orders_v2(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, AppError> {
    let orders = state.orders.search(&OrderSearch::default()).await?;
    Ok(Json(orders.iter().map(OrderDto::from).collect()))
}

/// GET /api/v3/orders
/// v3: one fetch-join statement for everything. One round trip, but the
/// to-many join multiplies rows and rules out pagination.
pub async fn orders_v3(State(state): State<AppState>) -> Result<Json<Vec<OrderDto>>, AppError> {
    let orders = state.orders.find_all_with_items().await?;
    Ok(Json(orders.iter().map(OrderDto::from).collect()))
}

/// GET /api/v3.1/orders?offset=&limit=
/// v3.1: join the to-one associations, page, then batch-load the line
/// collections. Two round trips and pagination works.
pub async fn orders_v3_page(
    State(state): State<AppState>,
    Query(page): Query<PageParams>,
) -> Result<Json<Vec<OrderDto>>, AppError> {
    let orders = state.orders.find_all_paged(page.offset, page.limit).await?;
    Ok(Json(orders.iter().map(OrderDto::from).collect()))
}

/// GET /api/v4/orders
/// v4: project straight into view records; one root query plus one line query
/// per order.
pub async fn orders_v4(State(state): State<AppState>) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(state.order_queries.find_order_views().await?))
}

/// GET /api/v5/orders
/// v5: project straight into view records; one root query plus one grouped
/// line query, attached via an order-id map.
pub async fn orders_v5(State(state): State<AppState>) -> Result<Json<Vec<OrderView>>, AppError> {
    Ok(Json(state.order_queries.find_order_views_batched().await?))
}

/// POST /api/orders
/// Place an order: one member, one item, a count.
pub async fn create_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let order_id = state
        .order_service
        .place_order(req.member_id, req.item_id, req.count)
        .await?;
    Ok((StatusCode::CREATED, Json(CreateOrderResponse { order_id })))
}

/// POST /api/orders/{id}/cancel
/// Cancel an order, restoring line stock. A second cancel is a 409.
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderDto>, AppError> {
    let order = state.order_service.cancel_order(order_id).await?;
    Ok(Json(OrderDto::from(&order)))
}

/// GET /api/members/{id}/orders
/// The read-only lookup index that replaces a member -> orders back-reference.
pub async fn member_orders(
    State(state): State<AppState>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<MemberOrdersResponse>, AppError> {
    state
        .members
        .find(member_id)
        .await?
        .ok_or_else(|| plaza_core::StoreError::NotFound(format!("member {member_id}")))?;
    let order_ids = state.orders.order_ids_by_member(member_id).await?;
    Ok(Json(MemberOrdersResponse {
        member_id,
        order_ids,
    }))
}
