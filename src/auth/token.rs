use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues and validates HS256-signed tokens.
///
/// The signing secret is fixed at construction and never changes afterwards, so
/// one instance can be shared by every worker.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// Generates a token for `subject`, valid for the configured lifetime from now.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_at(subject, Utc::now())
    }

    /// Generates a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry overflows".into()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies the signature and expiry of `token` and returns its subject.
    ///
    /// Returns `AppError::TokenExpired` once the expiry has passed and
    /// `AppError::TokenInvalid` for every other failure.
    pub fn validate(&self, token: &str) -> Result<String, AppError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }

    pub fn decode_claims(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::TokenExpired,
                _ => AppError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret.as_bytes(), Duration::hours(24))
    }

    #[test]
    fn test_token_round_trips_subject() {
        let tokens = service("test_secret_for_gen_verify");
        let token = tokens.issue("alice").unwrap();
        assert!(!token.is_empty());
        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_claims_carry_issue_and_expiry() {
        let tokens = service("secret");
        let issued_at = Utc::now();
        let token = tokens.issue_at("bob", issued_at).unwrap();
        let claims = tokens.decode_claims(&token).unwrap();

        assert_eq!(claims.sub, "bob");
        assert_eq!(claims.iat, issued_at.timestamp());
        assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());
    }

    #[test]
    fn test_token_expiration() {
        let tokens = service("test_secret_for_expiration");
        let issued_at = Utc::now() - Duration::hours(25);
        let token = tokens.issue_at("carol", issued_at).unwrap();

        match tokens.validate(&token) {
            Err(AppError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let tokens = service("secret");
        let issued_at = Utc::now() - Duration::hours(24) + Duration::minutes(1);
        let token = tokens.issue_at("dave", issued_at).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "dave");
    }

    #[test]
    fn test_invalid_token_signature() {
        let issuer = service("one_secret");
        let verifier = service("a_completely_different_secret");
        let token = issuer.issue("alice").unwrap();

        assert!(matches!(verifier.validate(&token), Err(AppError::TokenInvalid)));
    }

    #[test]
    fn test_tampered_and_malformed_tokens() {
        let tokens = service("secret");
        let token = tokens.issue("alice").unwrap();
        let other = tokens.issue("mallory").unwrap();

        // alice's header and signature around mallory's payload
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = other.split('.').nth(1).unwrap();
        let forged = parts.join(".");

        assert!(matches!(tokens.validate(&forged), Err(AppError::TokenInvalid)));
        assert!(matches!(tokens.validate("not-a-token"), Err(AppError::TokenInvalid)));
        assert!(matches!(tokens.validate(""), Err(AppError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token_with_wrong_signature_is_invalid() {
        let issuer = service("one_secret");
        let verifier = service("other_secret");
        let token = issuer
            .issue_at("alice", Utc::now() - Duration::hours(48))
            .unwrap();

        assert!(matches!(verifier.validate(&token), Err(AppError::TokenInvalid)));
    }
}
