use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::ValidationError;
use super::key::SigningKey;

/// Verifies access tokens produced by [`TokenIssuer`](super::TokenIssuer).
///
/// The signature is checked before any claim, so a correctly signed but
/// stale token always reports `Expired`. Expiry is strict: no leeway.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: SigningKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: key.clone(),
            validation,
        }
    }

    /// Decode and validate a token.
    ///
    /// # Errors
    /// * `Malformed` - Wrong segment count, bad base64/JSON, or missing claims
    /// * `InvalidSignature` - Signature or algorithm does not match
    /// * `Expired` - `exp` is in the past
    pub fn validate(&self, token: &str) -> Result<Claims, ValidationError> {
        decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    ValidationError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => ValidationError::Expired,
                _ => ValidationError::Malformed(e.to_string()),
            })
    }
}
