use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::SynthesisError;

const MODEL_ID: &str = "eleven_multilingual_v2";

/// Opaque text-to-speech collaborator: text + voice id in, audio bytes out.
/// The coordinator awaits full completion before any debit is issued.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// HTTP client for the ElevenLabs text-to-speech API
pub struct ElevenLabsSynthesizer {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl Synthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, voice_id);
        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({ "text": text, "model_id": MODEL_ID }))
            .send()
            .await
            .map_err(|e| SynthesisError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SynthesisError::Failed(format!(
                "synthesis provider returned {}",
                response.status()
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::Failed(e.to_string()))?;

        debug!(voice_id, bytes = audio.len(), "synthesis completed");
        Ok(audio.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/text-to-speech/JBFqnCBsd6RMkjVDRZzb")
            .match_header("xi-api-key", "xi-key")
            .with_status(200)
            .with_body(&[0x49u8, 0x44, 0x33, 0x04][..])
            .create_async()
            .await;

        let synth = ElevenLabsSynthesizer::new(&server.url(), "xi-key");
        let audio = synth
            .synthesize("hello", "JBFqnCBsd6RMkjVDRZzb")
            .await
            .unwrap();
        assert_eq!(audio, vec![0x49, 0x44, 0x33, 0x04]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_error_propagated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/text-to-speech/v1")
            .with_status(429)
            .create_async()
            .await;

        let synth = ElevenLabsSynthesizer::new(&server.url(), "xi-key");
        assert!(matches!(
            synth.synthesize("hello", "v1").await,
            Err(SynthesisError::Failed(_))
        ));
    }
}
