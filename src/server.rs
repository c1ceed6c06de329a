use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::handlers::{
    create_checkout, create_customer, get_balance, health_check, list_reconciliation, list_voices,
    payment_webhook, speak, AppState,
};

pub async fn create_app(state: AppState) -> Router {
    info!("⚙️ Setting up HTTP routes...");

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/customer", post(create_customer))
        .route("/balance", get(get_balance))
        .route("/voices", get(list_voices))
        .route("/checkout", post(create_checkout))
        .route("/speak", post(speak))
        .route("/webhook", post(payment_webhook))
        .route("/admin/reconciliation", get(list_reconciliation))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("✓ HTTP routes configured");
    app
}

pub async fn run_server(app: Router, bind_address: &str) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("🌐 Server listening on: {}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
