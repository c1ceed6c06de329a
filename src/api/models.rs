use serde::{Deserialize, Serialize};

// ========== REQUEST MODELS ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
    pub customer_id: Option<String>,
    /// Optional client-chosen token; retries carrying the same token
    /// collapse to one debit.
    pub request_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub pack: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub customer_id: Option<String>,
}

// ========== RESPONSE MODELS ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakResponse {
    /// Base64-encoded audio bytes
    pub audio: String,
    pub characters: u64,
    pub voice: String,
    pub balance: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub characters: u64,
    pub product_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub customer_id: String,
    pub balance: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance: u64,
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credited: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<u64>,
}

impl WebhookAck {
    pub fn ignored() -> Self {
        Self {
            received: true,
            credited: None,
            balance: None,
        }
    }

    pub fn credited(credited: u64, balance: u64) -> Self {
        Self {
            received: true,
            credited: Some(credited),
            balance: Some(balance),
        }
    }
}
