use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::LedgerError;
use crate::ledger::models::{CustomerProfile, LedgerEntry};

const BALANCE_CURRENCY: &str = "USD";

/// Seam over the external balance-keeping provider. The provider is the sole
/// owner of balances; this side only reads and submits keyed entries.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Point-in-time balance read; an absent wallet reads as 0.
    async fn get_balance(&self, customer_id: &str) -> Result<u64, LedgerError>;

    /// Submit a keyed credit or debit; returns the post-entry balance. Never
    /// retried here, a redelivery decision belongs to the caller and is made
    /// safe by the idempotency key.
    async fn apply_entry(&self, entry: &LedgerEntry) -> Result<u64, LedgerError>;

    /// Provision a new customer record; out of the hot path.
    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, LedgerError>;

    /// Create a hosted checkout session and return its payment link.
    async fn create_payment_link(&self, req: &PaymentLinkRequest) -> Result<String, LedgerError>;
}

#[derive(Debug, Clone)]
pub struct PaymentLinkRequest {
    pub product_id: String,
    pub customer_id: String,
    pub return_url: String,
}

/// HTTP client for the Dodo Payments wallet/ledger API
pub struct DodoLedgerClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct WalletList {
    #[serde(default)]
    items: Vec<Wallet>,
}

#[derive(Deserialize)]
struct Wallet {
    currency: String,
    balance: u64,
}

#[derive(Deserialize)]
struct EntryApplied {
    balance: u64,
}

#[derive(Deserialize)]
struct CustomerCreated {
    customer_id: String,
}

#[derive(Deserialize)]
struct PaymentCreated {
    payment_link: String,
}

impl DodoLedgerClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Pull the provider's own error message out of a non-2xx body when present
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_owned)
                .unwrap_or_else(|| format!("provider returned {}", status)),
            Err(_) => format!("provider returned {}", status),
        }
    }
}

#[async_trait]
impl LedgerApi for DodoLedgerClient {
    async fn get_balance(&self, customer_id: &str) -> Result<u64, LedgerError> {
        let url = format!("{}/customers/{}/wallets", self.base_url, customer_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| LedgerError::LookupFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::LookupFailed(Self::error_detail(response).await));
        }

        let wallets: WalletList = response
            .json()
            .await
            .map_err(|e| LedgerError::LookupFailed(e.to_string()))?;

        let balance = wallets
            .items
            .iter()
            .find(|w| w.currency == BALANCE_CURRENCY)
            .map(|w| w.balance)
            .unwrap_or(0);

        debug!(customer_id, balance, "fetched wallet balance");
        Ok(balance)
    }

    async fn apply_entry(&self, entry: &LedgerEntry) -> Result<u64, LedgerError> {
        let url = format!(
            "{}/customers/{}/wallets/ledger-entries",
            self.base_url, entry.customer_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "amount": entry.amount,
                "currency": BALANCE_CURRENCY,
                "entry_type": entry.direction.as_str(),
                "idempotency_key": entry.idempotency_key,
                "reason": entry.reason,
            }))
            .send()
            .await
            .map_err(|e| LedgerError::MutationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::MutationFailed(
                Self::error_detail(response).await,
            ));
        }

        let applied: EntryApplied = response
            .json()
            .await
            .map_err(|e| LedgerError::MutationFailed(e.to_string()))?;

        debug!(
            customer_id = %entry.customer_id,
            amount = entry.amount,
            entry_type = entry.direction.as_str(),
            idempotency_key = %entry.idempotency_key,
            balance = applied.balance,
            "ledger entry applied"
        );
        Ok(applied.balance)
    }

    async fn create_customer(&self, profile: &CustomerProfile) -> Result<String, LedgerError> {
        let url = format!("{}/customers", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(profile)
            .send()
            .await
            .map_err(|e| LedgerError::CustomerCreationFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::CustomerCreationFailed(
                Self::error_detail(response).await,
            ));
        }

        let created: CustomerCreated = response
            .json()
            .await
            .map_err(|e| LedgerError::CustomerCreationFailed(e.to_string()))?;
        Ok(created.customer_id)
    }

    async fn create_payment_link(&self, req: &PaymentLinkRequest) -> Result<String, LedgerError> {
        let url = format!("{}/payments", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "payment_link": true,
                "billing": { "country": "US" },
                "customer": { "customer_id": req.customer_id },
                "product_cart": [{ "product_id": req.product_id, "quantity": 1 }],
                "return_url": format!("{}?success=true", req.return_url),
            }))
            .send()
            .await
            .map_err(|e| LedgerError::CheckoutFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LedgerError::CheckoutFailed(
                Self::error_detail(response).await,
            ));
        }

        let created: PaymentCreated = response
            .json()
            .await
            .map_err(|e| LedgerError::CheckoutFailed(e.to_string()))?;
        Ok(created.payment_link)
    }
}
