use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::catalog::{ProductCatalog, VoiceCatalog};
use crate::error::{AppError, AppResult};
use crate::ledger::{LedgerApi, LedgerEntry};
use crate::spend::reconciliation::ReconciliationLog;
use crate::synthesis::Synthesizer;
use crate::webhook::{PaymentNotification, PAYMENT_SUCCEEDED_EVENT};

/// Maximum synthesizable text length; one balance unit per character
pub const MAX_TEXT_CHARS: usize = 500;

/// Characters granted on account creation
pub const WELCOME_CREDIT: u64 = 500;

/// Result of handling a verified payment notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Non-success lifecycle event: acknowledged so the provider stops
    /// redelivering, but no mutation is made.
    Ignored,
    Credited { credited: u64, balance: u64 },
}

/// Completed spend: the deliverable plus the post-debit balance
#[derive(Debug)]
pub struct SpeechOutput {
    pub audio: Vec<u8>,
    pub characters: u64,
    pub voice: String,
    pub balance: u64,
}

/// Orchestrates the check-balance -> synthesize -> debit sequence for spends
/// and the credit path for verified top-ups. Holds no balance state of its
/// own; the external ledger is the single source of truth.
pub struct SpendCoordinator {
    ledger: Arc<dyn LedgerApi>,
    synthesizer: Arc<dyn Synthesizer>,
    products: Arc<ProductCatalog>,
    voices: Arc<VoiceCatalog>,
    reconciliation: Arc<ReconciliationLog>,
    // Serializes spends per customer so two concurrent requests cannot both
    // pass the balance check against the same stale read.
    customer_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SpendCoordinator {
    pub fn new(
        ledger: Arc<dyn LedgerApi>,
        synthesizer: Arc<dyn Synthesizer>,
        products: Arc<ProductCatalog>,
        voices: Arc<VoiceCatalog>,
        reconciliation: Arc<ReconciliationLog>,
    ) -> Self {
        Self {
            ledger,
            synthesizer,
            products,
            voices,
            reconciliation,
            customer_locks: Mutex::new(HashMap::new()),
        }
    }

    fn customer_lock(&self, customer_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.customer_locks
            .lock()
            .entry(customer_id.to_string())
            .or_default()
            .clone()
    }

    /// Spend path: Validated -> BalanceChecked -> Produced -> Debited.
    ///
    /// The balance check strictly precedes synthesis, and the debit strictly
    /// follows confirmed synthesis success: a customer is never charged for
    /// audio that was not produced, and never receives audio without a debit
    /// being attempted.
    pub async fn speak(
        &self,
        customer_id: &str,
        text: &str,
        voice: Option<&str>,
        request_token: Option<&str>,
    ) -> AppResult<SpeechOutput> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("No text provided".to_string()));
        }
        let cost = text.chars().count() as u64;
        if cost > MAX_TEXT_CHARS as u64 {
            return Err(AppError::InvalidInput(format!(
                "Text too long. Max {} characters.",
                MAX_TEXT_CHARS
            )));
        }
        let voice = self.voices.resolve(voice);

        let lock = self.customer_lock(customer_id);
        let _guard = lock.lock().await;

        let balance = self.ledger.get_balance(customer_id).await?;
        if balance < cost {
            info!(customer_id, needed = cost, have = balance, "spend rejected");
            return Err(AppError::InsufficientBalance {
                needed: cost,
                have: balance,
            });
        }

        // Synthesis failure exits here with no debit attempted
        let audio = self.synthesizer.synthesize(text, &voice.voice_id).await?;

        let entry = LedgerEntry::debit_for_speech(customer_id, cost, request_token);
        let balance = match self.ledger.apply_entry(&entry).await {
            Ok(balance) => balance,
            Err(err) => {
                // The deliverable already exists; record the gap for operator
                // replay instead of losing it with the response.
                error!(
                    customer_id,
                    amount = cost,
                    idempotency_key = %entry.idempotency_key,
                    %err,
                    "debit failed after synthesis, queued for reconciliation"
                );
                self.reconciliation.record(&entry);
                return Err(err.into());
            }
        };

        info!(customer_id, characters = cost, balance, "speech generated and debited");
        Ok(SpeechOutput {
            audio,
            characters: cost,
            voice: voice.name.clone(),
            balance,
        })
    }

    /// Top-up path for an already-verified notification. Callers must have
    /// run signature verification first; nothing here re-checks it.
    pub async fn credit_payment(
        &self,
        event_type: &str,
        event: &PaymentNotification,
    ) -> AppResult<CreditOutcome> {
        if event_type != PAYMENT_SUCCEEDED_EVENT {
            return Ok(CreditOutcome::Ignored);
        }

        let customer_id = event
            .customer_id()
            .ok_or_else(|| AppError::MalformedEvent("Missing customer info".to_string()))?;
        let product_id = event
            .first_product_id()
            .ok_or_else(|| AppError::MalformedEvent("Missing product info".to_string()))?;
        let payment_id = event
            .payment_id
            .as_deref()
            .ok_or_else(|| AppError::MalformedEvent("Missing payment id".to_string()))?;

        let characters = self
            .products
            .credits_for_product(product_id)
            .ok_or_else(|| {
                warn!(product_id, "payment event references unknown product");
                AppError::UnknownProduct(product_id.to_string())
            })?;

        let entry = LedgerEntry::credit_for_payment(customer_id, payment_id, characters);
        let balance = self.ledger.apply_entry(&entry).await?;

        info!(customer_id, credited = characters, balance, "payment credited");
        Ok(CreditOutcome::Credited {
            credited: characters,
            balance,
        })
    }

    /// Provision a customer and grant the welcome credit. The welcome entry
    /// is keyed by the customer id, so a re-run cannot double-grant.
    pub async fn create_customer(&self) -> AppResult<(String, u64)> {
        let profile = crate::ledger::CustomerProfile::generated();
        let customer_id = self.ledger.create_customer(&profile).await?;

        let entry = LedgerEntry::welcome_credit(&customer_id, WELCOME_CREDIT);
        let balance = self.ledger.apply_entry(&entry).await?;

        info!(customer_id = %customer_id, balance, "customer created with welcome credit");
        Ok((customer_id, balance))
    }
}
