use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use base64::Engine;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use super::models::*;
use crate::{
    catalog::{ProductCatalog, VoiceCatalog},
    error::{AppError, AppResult},
    ledger::{LedgerApi, PaymentLinkRequest},
    spend::{CreditOutcome, PendingDebit, ReconciliationLog, SpendCoordinator},
    webhook::{PaymentNotification, SignatureVerifier, WebhookHeaders},
};

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SpendCoordinator>,
    pub ledger: Arc<dyn LedgerApi>,
    pub products: Arc<ProductCatalog>,
    pub voices: Arc<VoiceCatalog>,
    pub reconciliation: Arc<ReconciliationLog>,
    pub webhook_secret: String,
    pub site_url: String,
}

/// GET /health
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Create a customer and grant the welcome credit
/// POST /customer
pub async fn create_customer(
    State(state): State<AppState>,
) -> AppResult<Json<CustomerResponse>> {
    let (customer_id, balance) = state.coordinator.create_customer().await?;
    Ok(Json(CustomerResponse {
        customer_id,
        balance,
    }))
}

/// GET /balance?customer_id=<id>
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<BalanceResponse>> {
    let customer_id = query
        .customer_id
        .ok_or_else(|| AppError::InvalidInput("customer_id is required".to_string()))?;

    let balance = state.ledger.get_balance(&customer_id).await?;
    Ok(Json(BalanceResponse {
        balance,
        customer_id,
    }))
}

/// GET /voices
pub async fn list_voices(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::to_value(state.voices.all()).unwrap_or_default())
}

/// Create a hosted checkout session for a credit pack
/// POST /checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    let pack = request
        .pack
        .as_deref()
        .and_then(|p| state.products.by_pack(p))
        .ok_or_else(|| AppError::InvalidInput("Invalid pack".to_string()))?;
    let customer_id = request
        .customer_id
        .ok_or_else(|| AppError::InvalidInput("customerId is required".to_string()))?;

    let checkout_url = state
        .ledger
        .create_payment_link(&PaymentLinkRequest {
            product_id: pack.product_id.clone(),
            customer_id,
            return_url: state.site_url.clone(),
        })
        .await?;

    info!(pack = %pack.name, "checkout session created");
    Ok(Json(CheckoutResponse {
        checkout_url,
        characters: pack.characters,
        product_name: pack.name.clone(),
    }))
}

/// Generate speech with server-side credit management
/// POST /speak
pub async fn speak(
    State(state): State<AppState>,
    Json(request): Json<SpeakRequest>,
) -> AppResult<Json<SpeakResponse>> {
    let customer_id = request
        .customer_id
        .ok_or_else(|| AppError::InvalidInput("customerId is required".to_string()))?;
    let text = request.text.unwrap_or_default();

    let output = state
        .coordinator
        .speak(
            &customer_id,
            &text,
            request.voice.as_deref(),
            request.request_token.as_deref(),
        )
        .await?;

    Ok(Json(SpeakResponse {
        audio: base64::engine::general_purpose::STANDARD.encode(&output.audio),
        characters: output.characters,
        voice: output.voice,
        balance: output.balance,
    }))
}

/// Payment provider webhook. The raw body is verified before anything else
/// runs; a forged or replayed notification never reaches the ledger.
/// POST /webhook
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> AppResult<Json<WebhookAck>> {
    let webhook_headers = WebhookHeaders {
        id: header_str(&headers, "webhook-id"),
        timestamp: header_str(&headers, "webhook-timestamp"),
        signature: header_str(&headers, "webhook-signature"),
    };

    SignatureVerifier::verify(
        &body,
        &webhook_headers,
        &state.webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|err| {
        warn!(%err, "webhook rejected");
        err
    })?;

    let event_type = header_str(&headers, "webhook-event-type").unwrap_or_default();
    let event: PaymentNotification = serde_json::from_str(&body)
        .map_err(|e| AppError::MalformedEvent(format!("Unparseable event body: {}", e)))?;

    match state
        .coordinator
        .credit_payment(event_type, &event)
        .await?
    {
        CreditOutcome::Ignored => Ok(Json(WebhookAck::ignored())),
        CreditOutcome::Credited { credited, balance } => {
            Ok(Json(WebhookAck::credited(credited, balance)))
        }
    }
}

/// Produced-but-not-debited spends awaiting operator replay or write-off
/// GET /admin/reconciliation
pub async fn list_reconciliation(State(state): State<AppState>) -> Json<Vec<PendingDebit>> {
    Json(state.reconciliation.snapshot())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
