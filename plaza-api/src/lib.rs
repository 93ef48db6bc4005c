use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod orders;
pub mod simple_orders;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route("/api/v1/orders", get(orders::orders_v1))
        .route("/api/v2/orders", get(orders::orders_v2))
        .route("/api/v3/orders", get(orders::orders_v3))
        .route("/api/v3.1/orders", get(orders::orders_v3_page))
        .route("/api/v4/orders", get(orders::orders_v4))
        .route("/api/v5/orders", get(orders::orders_v5))
        .route("/api/v1/simple-orders", get(simple_orders::simple_orders_v1))
        .route("/api/v2/simple-orders", get(simple_orders::simple_orders_v2))
        .route("/api/v3/simple-orders", get(simple_orders::simple_orders_v3))
        .route("/api/v4/simple-orders", get(simple_orders::simple_orders_v4))
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/{id}/cancel", post(orders::cancel_order))
        .route("/api/members/{id}/orders", get(orders::member_orders))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
