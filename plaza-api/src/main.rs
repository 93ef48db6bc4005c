use plaza_api::{app, AppState};
use plaza_store::{
    DbClient, PgItemRepository, PgMemberRepository, PgOrderQueryRepository, PgOrderRepository,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plaza_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = plaza_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting Plaza API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let state = AppState::new(
        Arc::new(PgOrderRepository::new(db.pool.clone())),
        Arc::new(PgOrderQueryRepository::new(db.pool.clone())),
        Arc::new(PgItemRepository::new(db.pool.clone())),
        Arc::new(PgMemberRepository::new(db.pool.clone())),
    );

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
