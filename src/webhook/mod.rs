pub mod models;
pub mod verifier;

pub use models::{PaymentNotification, PAYMENT_SUCCEEDED_EVENT};
pub use verifier::{SignatureVerifier, WebhookHeaders, REPLAY_WINDOW_SECS};
