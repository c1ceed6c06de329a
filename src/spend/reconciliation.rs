use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::ledger::LedgerEntry;

/// A debit that failed after the deliverable was already produced. The
/// customer received value that is not yet reflected in the ledger; an
/// operator can replay the entry (same idempotency key) or write it off.
#[derive(Debug, Clone, Serialize)]
pub struct PendingDebit {
    pub customer_id: String,
    pub amount: u64,
    pub idempotency_key: String,
    pub reason: String,
    pub occurred_at: DateTime<Utc>,
}

/// Append-only in-memory record of produced-but-not-debited spends
#[derive(Default)]
pub struct ReconciliationLog {
    entries: RwLock<Vec<PendingDebit>>,
}

impl ReconciliationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: &LedgerEntry) {
        self.entries.write().push(PendingDebit {
            customer_id: entry.customer_id.clone(),
            amount: entry.amount,
            idempotency_key: entry.idempotency_key.clone(),
            reason: entry.reason.clone(),
            occurred_at: Utc::now(),
        });
    }

    pub fn snapshot(&self) -> Vec<PendingDebit> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
