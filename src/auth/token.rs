//! Access-token expiry derivation.
//!
//! The backend issues standard signed bearer tokens whose payload segment
//! carries a numeric `exp` claim (seconds since epoch). Decoding happens
//! purely for scheduling silent refreshes; the server remains the authority
//! on token validity and will reject anything stale regardless of what we
//! compute here.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// Assumed lifetime when the token payload cannot be decoded.
/// Favors availability over precision: a token we cannot read is treated as
/// good for an hour, and the server rejects it if it is not.
const FALLBACK_TTL_SECS: i64 = 3600;

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
}

/// Derive the absolute expiry instant of an access token.
///
/// Total function: any malformed token (wrong segment count, bad base64,
/// bad JSON, missing `exp`) yields now + 1 hour instead of an error.
pub fn derive_expiry(access_token: &str) -> DateTime<Utc> {
    decode_exp(access_token).unwrap_or_else(|| Utc::now() + Duration::seconds(FALLBACK_TTL_SECS))
}

fn decode_exp(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;

    // Tokens in the wild use the url-safe alphabet, but accept standard too.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;

    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.exp?;

    DateTime::from_timestamp_millis(exp.checked_mul(1000)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a fake token with the given JSON payload segment.
    fn token_with_payload(payload: &str) -> String {
        let encoded = URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("header.{}.signature", encoded)
    }

    #[test]
    fn test_derive_expiry_from_exp_claim() {
        let token = token_with_payload(r#"{"sub":"abc123","exp":1700000000}"#);
        let expiry = derive_expiry(&token);
        assert_eq!(expiry.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_derive_expiry_ignores_other_claims() {
        let token = token_with_payload(r#"{"exp":2000000000,"iat":1999996400,"role":"admin"}"#);
        let expiry = derive_expiry(&token);
        assert_eq!(expiry.timestamp_millis(), 2_000_000_000_000);
    }

    #[test]
    fn test_fallback_when_exp_missing() {
        let token = token_with_payload(r#"{"sub":"abc123"}"#);
        let expiry = derive_expiry(&token);
        let delta = expiry - Utc::now();
        assert!(delta > Duration::seconds(3590) && delta <= Duration::seconds(3601));
    }

    #[test]
    fn test_fallback_on_malformed_token() {
        for garbage in ["", "no-dots-here", "a.%%%not-base64%%%.c", "only.one"] {
            let expiry = derive_expiry(garbage);
            let delta = expiry - Utc::now();
            assert!(
                delta > Duration::seconds(3590) && delta <= Duration::seconds(3601),
                "expected ~1h fallback for {:?}",
                garbage
            );
        }
    }

    #[test]
    fn test_fallback_on_non_json_payload() {
        let encoded = URL_SAFE_NO_PAD.encode(b"not json at all");
        let token = format!("h.{}.s", encoded);
        let delta = derive_expiry(&token) - Utc::now();
        assert!(delta > Duration::seconds(3590) && delta <= Duration::seconds(3601));
    }

    #[test]
    fn test_standard_alphabet_accepted() {
        let encoded = STANDARD_NO_PAD.encode(r#"{"exp":1700000000}"#.as_bytes());
        let token = format!("h.{}.s", encoded);
        assert_eq!(derive_expiry(&token).timestamp_millis(), 1_700_000_000_000);
    }
}
