pub mod api;
pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod server;
pub mod spend;
pub mod synthesis;
pub mod webhook;
