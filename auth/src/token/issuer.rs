use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::TokenError;
use super::key::SigningKey;

/// Issues HS256-signed access tokens with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: SigningKey,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer signing with `key`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - `lifetime` is zero or negative
    pub fn new(key: &SigningKey, lifetime: Duration) -> Result<Self, TokenError> {
        if lifetime <= Duration::zero() {
            return Err(TokenError::InvalidLifetime(lifetime.num_seconds()));
        }

        Ok(Self {
            key: key.clone(),
            lifetime,
        })
    }

    /// Lifetime applied to every generated token.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Generate a token for a user, issued now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn generate(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        let claims = Claims::for_user(user_id, username, Utc::now(), self.lifetime);
        self.encode(&claims)
    }

    /// Sign already-built claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, claims, self.key.encoding_key())
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::validator::TokenValidator;

    fn key() -> SigningKey {
        SigningKey::from_secret(b"my_secret_key_at_least_32_bytes_long!").unwrap()
    }

    #[test]
    fn test_generate_produces_three_segments() {
        let issuer = TokenIssuer::new(&key(), Duration::hours(24)).unwrap();

        let token = issuer.generate(1, "ahmed").expect("Failed to generate token");
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_generated_claims_span_lifetime() {
        let key = key();
        let issuer = TokenIssuer::new(&key, Duration::minutes(90)).unwrap();
        let validator = TokenValidator::new(&key);

        let token = issuer.generate(3, "carol").unwrap();
        let claims = validator.validate(&token).unwrap();

        assert_eq!(issuer.lifetime(), Duration::minutes(90));
        assert_eq!(claims.exp - claims.iat, issuer.lifetime().num_seconds());
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        assert_eq!(
            TokenIssuer::new(&key(), Duration::zero()).unwrap_err(),
            TokenError::InvalidLifetime(0)
        );
        assert_eq!(
            TokenIssuer::new(&key(), Duration::seconds(-5)).unwrap_err(),
            TokenError::InvalidLifetime(-5)
        );
    }
}
