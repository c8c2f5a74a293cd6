// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token expiry checks.
//!
//! The client never verifies signatures (the server does that on every
//! request); it only reads the `exp` claim to decide whether to keep showing
//! protected content. Anything that cannot be read is treated as expired.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;

use crate::time_utils::unix_now;

/// The only claim the client reads.
#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    /// NumericDate; servers occasionally emit fractional seconds
    #[serde(default)]
    exp: Option<f64>,
}

#[derive(Debug, thiserror::Error)]
enum TokenError {
    #[error("token could not be decoded: {0}")]
    Decode(#[from] jsonwebtoken::errors::Error),

    #[error("token has no exp claim")]
    MissingExpiry,
}

/// Result of inspecting an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Expired,
    /// Undecodable or missing its `exp` claim
    Malformed,
    /// No token at all
    Missing,
}

impl TokenStatus {
    pub fn is_valid(self) -> bool {
        self == TokenStatus::Valid
    }
}

fn read_expiry(token: &str) -> Result<f64, TokenError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<ExpiryClaim>(token, &DecodingKey::from_secret(&[]), &validation)?;
    data.claims.exp.ok_or(TokenError::MissingExpiry)
}

/// Classify `token` at instant `now`.
///
/// The token is expired once `exp - skew_secs <= now`, i.e. `skew_secs`
/// shifts the cut-off earlier so a request is not sent with a token that
/// lapses in flight.
pub fn inspect_at(token: &str, skew_secs: u64, now: DateTime<Utc>) -> TokenStatus {
    if token.trim().is_empty() {
        return TokenStatus::Missing;
    }

    match read_expiry(token) {
        Ok(exp) if exp - skew_secs as f64 <= unix_now(now) => TokenStatus::Expired,
        Ok(_) => TokenStatus::Valid,
        Err(e) => {
            tracing::debug!(error = %e, "Unreadable access token, treating as expired");
            TokenStatus::Malformed
        }
    }
}

/// Whether `token` must be treated as expired at instant `now`.
pub fn is_expired_at(token: &str, skew_secs: u64, now: DateTime<Utc>) -> bool {
    !inspect_at(token, skew_secs, now).is_valid()
}

/// Whether `token` must be treated as expired right now. Never panics.
pub fn is_expired(token: &str, skew_secs: u64) -> bool {
    is_expired_at(token, skew_secs, Utc::now())
}

/// Token checks bound to the configured clock-skew tolerance.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenValidator {
    skew_secs: u64,
}

impl TokenValidator {
    pub fn new(skew_secs: u64) -> Self {
        Self { skew_secs }
    }

    pub fn skew_secs(&self) -> u64 {
        self.skew_secs
    }

    /// Classify a possibly absent token against the wall clock.
    pub fn status(&self, token: Option<&str>) -> TokenStatus {
        match token {
            Some(token) => inspect_at(token, self.skew_secs, Utc::now()),
            None => TokenStatus::Missing,
        }
    }

    pub fn is_expired(&self, token: &str) -> bool {
        is_expired(token, self.skew_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    fn token_expiring_at(exp: DateTime<Utc>) -> String {
        let claims = Claims {
            sub: "42".to_string(),
            exp: exp.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"server-side-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_future_token_is_valid() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::hours(1));
        assert_eq!(inspect_at(&token, 0, now), TokenStatus::Valid);
        assert!(!is_expired(&token, 0));
    }

    #[test]
    fn test_past_token_is_expired() {
        let now = Utc::now();
        let token = token_expiring_at(now - Duration::seconds(1));
        assert_eq!(inspect_at(&token, 0, now), TokenStatus::Expired);
    }

    #[test]
    fn test_token_is_expired_at_its_exp_second() {
        let now = Utc::now();
        let exp = DateTime::from_timestamp(now.timestamp(), 0).unwrap();
        let token = token_expiring_at(exp);
        assert!(is_expired_at(&token, 0, exp));
    }

    #[test]
    fn test_skew_tightens_expiry() {
        let now = Utc::now();
        let token = token_expiring_at(now + Duration::seconds(20));

        assert!(!is_expired_at(&token, 0, now));
        assert!(!is_expired_at(&token, 10, now));
        assert!(is_expired_at(&token, 30, now));
    }

    #[test]
    fn test_signature_is_not_checked() {
        // Signed with a key the client has never seen
        let token = token_expiring_at(Utc::now() + Duration::hours(1));
        let (body, _) = token.rsplit_once('.').unwrap();
        let tampered = format!("{}.bm90LWEtc2lnbmF0dXJl", body);
        assert!(!is_expired(&tampered, 0));
    }

    #[test]
    fn test_malformed_tokens_fail_closed() {
        for token in ["garbage", "a.b.c", "...", "eyJhbGciOiJIUzI1NiJ9.e30"] {
            assert_eq!(inspect_at(token, 0, Utc::now()), TokenStatus::Malformed);
            assert!(is_expired(token, 0));
        }
        assert_eq!(inspect_at("   ", 0, Utc::now()), TokenStatus::Missing);
    }

    #[test]
    fn test_validator_status() {
        let validator = TokenValidator::new(5);
        assert_eq!(validator.status(None), TokenStatus::Missing);

        let token = token_expiring_at(Utc::now() + Duration::seconds(2));
        assert_eq!(validator.status(Some(&token)), TokenStatus::Expired);
        assert!(validator.is_expired(&token));
    }
}
