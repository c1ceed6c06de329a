pub mod client;
pub mod models;

pub use client::{DodoLedgerClient, LedgerApi, PaymentLinkRequest};
pub use models::{CustomerProfile, EntryDirection, LedgerEntry};
