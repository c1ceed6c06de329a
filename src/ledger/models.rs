use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Credit,
    Debit,
}

impl EntryDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryDirection::Credit => "credit",
            EntryDirection::Debit => "debit",
        }
    }
}

/// An attempted balance mutation. The idempotency key is the sole
/// de-duplication mechanism: the provider applies same-key entries at most
/// once, so the key must be derived from the triggering event, never from
/// wall-clock time alone.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub customer_id: String,
    pub amount: u64,
    pub direction: EntryDirection,
    pub idempotency_key: String,
    pub reason: String,
}

impl LedgerEntry {
    /// Credit for a settled payment, keyed by the provider's payment id so a
    /// redelivered notification collapses to one credit.
    pub fn credit_for_payment(customer_id: &str, payment_id: &str, characters: u64) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            amount: characters,
            direction: EntryDirection::Credit,
            idempotency_key: payment_id.to_string(),
            reason: format!("Credit pack purchase: {} characters", characters),
        }
    }

    /// One-time signup grant, keyed by the customer id.
    pub fn welcome_credit(customer_id: &str, amount: u64) -> Self {
        Self {
            customer_id: customer_id.to_string(),
            amount,
            direction: EntryDirection::Credit,
            idempotency_key: format!("welcome_{}", customer_id),
            reason: format!("Welcome bonus: {} free characters", amount),
        }
    }

    /// Debit for a completed synthesis. A caller-supplied request token makes
    /// client retries of the same logical request collapse to one debit;
    /// without one a fresh UUID scopes the key to this attempt only.
    pub fn debit_for_speech(customer_id: &str, cost: u64, request_token: Option<&str>) -> Self {
        let token = request_token
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        Self {
            customer_id: customer_id.to_string(),
            amount: cost,
            direction: EntryDirection::Debit,
            idempotency_key: format!("tts_{}_{}", customer_id, token),
            reason: format!("TTS generation: {} characters", cost),
        }
    }
}

/// Profile submitted when provisioning a new customer record
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub email: String,
    pub name: String,
}

impl CustomerProfile {
    /// Anonymous signup identity; the provider issues the customer id.
    pub fn generated() -> Self {
        let tag = Uuid::new_v4().simple().to_string();
        Self {
            email: format!("user_{}@chirpify.ai", &tag[..12]),
            name: "Chirpify User".to_string(),
        }
    }
}
