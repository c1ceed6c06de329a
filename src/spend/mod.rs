pub mod coordinator;
pub mod reconciliation;

pub use coordinator::{CreditOutcome, SpeechOutput, SpendCoordinator, MAX_TEXT_CHARS, WELCOME_CREDIT};
pub use reconciliation::{PendingDebit, ReconciliationLog};
