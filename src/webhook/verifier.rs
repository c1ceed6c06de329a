use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::VerifyError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age (either direction) a notification timestamp may have
pub const REPLAY_WINDOW_SECS: i64 = 300;

const SECRET_PREFIX: &str = "whsec_";

/// Signature-relevant headers of an inbound payment notification
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookHeaders<'a> {
    pub id: Option<&'a str>,
    pub timestamp: Option<&'a str>,
    pub signature: Option<&'a str>,
}

/// Verifies provider webhook signatures before any state is touched.
///
/// The signed content is the exact concatenation `{id}.{timestamp}.{raw_body}`
/// over the bytes as received; re-serializing the body would invalidate the
/// signature. The signature header may carry several space-separated
/// `version,digest` pairs to support secret rotation.
pub struct SignatureVerifier;

impl SignatureVerifier {
    pub fn verify(
        raw_body: &str,
        headers: &WebhookHeaders,
        secret: &str,
        now: i64,
    ) -> Result<(), VerifyError> {
        let (id, timestamp_raw, signature) = match (headers.id, headers.timestamp, headers.signature)
        {
            (Some(id), Some(ts), Some(sig)) => (id, ts, sig),
            _ => return Err(VerifyError::MissingHeaders),
        };

        let timestamp: i64 = timestamp_raw
            .parse()
            .map_err(|_| VerifyError::MalformedTimestamp)?;
        if (now - timestamp).abs() > REPLAY_WINDOW_SECS {
            return Err(VerifyError::StaleNotification);
        }

        let key = Self::decode_secret(secret)?;
        let mut mac =
            HmacSha256::new_from_slice(&key).map_err(|_| VerifyError::MalformedSecret)?;
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp_raw.as_bytes());
        mac.update(b".");
        mac.update(raw_body.as_bytes());

        let engine = base64::engine::general_purpose::STANDARD;
        for token in signature.split_whitespace() {
            let Some((_version, digest)) = token.split_once(',') else {
                continue;
            };
            let Ok(candidate) = engine.decode(digest) else {
                continue;
            };
            // Mac::verify_slice is constant-time
            if mac.clone().verify_slice(&candidate).is_ok() {
                return Ok(());
            }
        }

        Err(VerifyError::InvalidSignature)
    }

    fn decode_secret(secret: &str) -> Result<Vec<u8>, VerifyError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| VerifyError::MalformedSecret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_dGVzdC1zaWduaW5nLWtleQ=="; // "test-signing-key"

    fn sign(id: &str, timestamp: i64, body: &str, secret: &str) -> String {
        let engine = base64::engine::general_purpose::STANDARD;
        let key = engine
            .decode(secret.strip_prefix("whsec_").unwrap_or(secret))
            .unwrap();
        let mut mac = HmacSha256::new_from_slice(&key).unwrap();
        mac.update(format!("{}.{}.{}", id, timestamp, body).as_bytes());
        engine.encode(mac.finalize().into_bytes())
    }

    fn headers<'a>(id: &'a str, ts: &'a str, sig: &'a str) -> WebhookHeaders<'a> {
        WebhookHeaders {
            id: Some(id),
            timestamp: Some(ts),
            signature: Some(sig),
        }
    }

    #[test]
    fn test_valid_signature_accepted() {
        let now = 1_700_000_000;
        let body = r#"{"payment_id":"pay_123"}"#;
        let sig = format!("v1,{}", sign("msg_1", now, body, SECRET));
        let ts = now.to_string();

        assert!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now).is_ok()
        );
    }

    #[test]
    fn test_timestamp_at_window_edge() {
        let now = 1_700_000_000;
        let body = "{}";

        let signed_at = now - REPLAY_WINDOW_SECS;
        let sig = format!("v1,{}", sign("msg_1", signed_at, body, SECRET));
        let ts = signed_at.to_string();
        assert!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now).is_ok()
        );

        let signed_at = now - REPLAY_WINDOW_SECS - 1;
        let sig = format!("v1,{}", sign("msg_1", signed_at, body, SECRET));
        let ts = signed_at.to_string();
        assert_eq!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now),
            Err(VerifyError::StaleNotification)
        );
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let now = 1_700_000_000;
        let body = "{}";
        let signed_at = now + REPLAY_WINDOW_SECS + 1;
        let sig = format!("v1,{}", sign("msg_1", signed_at, body, SECRET));
        let ts = signed_at.to_string();

        assert_eq!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now),
            Err(VerifyError::StaleNotification)
        );
    }

    #[test]
    fn test_missing_headers_rejected() {
        let now = 1_700_000_000;
        let partial = WebhookHeaders {
            id: Some("msg_1"),
            timestamp: Some("1700000000"),
            signature: None,
        };

        assert_eq!(
            SignatureVerifier::verify("{}", &partial, SECRET, now),
            Err(VerifyError::MissingHeaders)
        );
    }

    #[test]
    fn test_tampered_body_rejected() {
        let now = 1_700_000_000;
        let sig = format!(
            "v1,{}",
            sign("msg_1", now, r#"{"payment_id":"pay_123"}"#, SECRET)
        );
        let ts = now.to_string();

        assert_eq!(
            SignatureVerifier::verify(
                r#"{"payment_id":"pay_124"}"#,
                &headers("msg_1", &ts, &sig),
                SECRET,
                now
            ),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn test_rotated_secret_second_pair_accepted() {
        let now = 1_700_000_000;
        let body = "{}";
        let old_secret = "whsec_b2xkLXNpZ25pbmcta2V5"; // "old-signing-key"
        let sig = format!(
            "v1,{} v1,{}",
            sign("msg_1", now, body, old_secret),
            sign("msg_1", now, body, SECRET)
        );
        let ts = now.to_string();

        assert!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now).is_ok()
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = 1_700_000_000;
        let body = "{}";
        let sig = format!("v1,{}", sign("msg_1", now, body, "whsec_b3RoZXIta2V5"));
        let ts = now.to_string();

        assert_eq!(
            SignatureVerifier::verify(body, &headers("msg_1", &ts, &sig), SECRET, now),
            Err(VerifyError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_timestamp_rejected() {
        let sig = "v1,AAAA";
        assert_eq!(
            SignatureVerifier::verify("{}", &headers("msg_1", "soon", sig), SECRET, 0),
            Err(VerifyError::MalformedTimestamp)
        );
    }
}
