use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bind_address: String,
    pub ledger_base_url: String,
    pub ledger_api_key: String,
    pub webhook_secret: String,
    pub synthesis_base_url: String,
    pub synthesis_api_key: String,
    pub site_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let ledger_base_url = match std::env::var("DODO_ENV").as_deref() {
            Ok("live") => "https://live.dodopayments.com".to_string(),
            _ => "https://test.dodopayments.com".to_string(),
        };

        Ok(Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            ledger_base_url,
            ledger_api_key: std::env::var("DODO_PAYMENTS_API_KEY").map_err(|_| {
                config::ConfigError::Message("DODO_PAYMENTS_API_KEY must be set".to_string())
            })?,
            webhook_secret: std::env::var("DODO_WEBHOOK_SECRET").map_err(|_| {
                config::ConfigError::Message("DODO_WEBHOOK_SECRET must be set".to_string())
            })?,
            synthesis_base_url: std::env::var("ELEVENLABS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            synthesis_api_key: std::env::var("ELEVENLABS_KEY").map_err(|_| {
                config::ConfigError::Message("ELEVENLABS_KEY must be set".to_string())
            })?,
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
