use std::sync::Arc;

use tracing::info;

use crate::{
    api::handlers::AppState,
    catalog::{ProductCatalog, VoiceCatalog},
    config::Config,
    ledger::{DodoLedgerClient, LedgerApi},
    spend::{ReconciliationLog, SpendCoordinator},
    synthesis::{ElevenLabsSynthesizer, Synthesizer},
};

pub fn initialize_app_state(config: &Config) -> AppState {
    info!("Initializing application components ...");

    let ledger: Arc<dyn LedgerApi> = Arc::new(DodoLedgerClient::new(
        &config.ledger_base_url,
        &config.ledger_api_key,
    ));
    info!("✅ Ledger client initialized for {}", config.ledger_base_url);

    let synthesizer: Arc<dyn Synthesizer> = Arc::new(ElevenLabsSynthesizer::new(
        &config.synthesis_base_url,
        &config.synthesis_api_key,
    ));
    info!("✅ Synthesis client initialized");

    // Catalogs are built once here and only ever read afterwards
    let products = Arc::new(ProductCatalog::standard());
    let voices = Arc::new(VoiceCatalog::standard());
    let reconciliation = Arc::new(ReconciliationLog::new());

    let coordinator = Arc::new(SpendCoordinator::new(
        ledger.clone(),
        synthesizer,
        products.clone(),
        voices.clone(),
        reconciliation.clone(),
    ));

    AppState {
        coordinator,
        ledger,
        products,
        voices,
        reconciliation,
        webhook_secret: config.webhook_secret.clone(),
        site_url: config.site_url.clone(),
    }
}
