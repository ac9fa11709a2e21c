use chrono::Duration;

use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::Claims;
use crate::token::SigningKey;
use crate::token::TokenError;
use crate::token::TokenIssuer;
use crate::token::TokenValidator;
use crate::token::ValidationError;

/// Authentication coordinator combining password verification and token handling.
///
/// Built once at startup from the process-wide secret and shared read-only
/// between request tasks.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl From<PasswordError> for AuthenticationError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::Mismatch => AuthenticationError::InvalidCredentials,
            other => AuthenticationError::Password(other),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Secret key for token signing
    /// * `token_lifetime` - Validity window of issued tokens
    ///
    /// # Errors
    /// * `MissingSecret` - `secret` is empty
    /// * `InvalidLifetime` - `token_lifetime` is not positive
    pub fn new(secret: &[u8], token_lifetime: Duration) -> Result<Self, TokenError> {
        let key = SigningKey::from_secret(secret)?;

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(&key, token_lifetime)?,
            token_validator: TokenValidator::new(&key),
        })
    }

    /// Hash a password for storage.
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for the user.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Subject to put in the token
    /// * `username` - Username to put in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash is malformed
    /// * `Token` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
        username: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        self.password_hasher.verify(stored_hash, password)?;

        let access_token = self.token_issuer.generate(user_id, username)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a token without password verification.
    pub fn generate_token(&self, user_id: i64, username: &str) -> Result<String, TokenError> {
        self.token_issuer.generate(user_id, username)
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, ValidationError> {
        self.token_validator.validate(token)
    }

    /// Issuer used by this authenticator.
    pub fn issuer(&self) -> &TokenIssuer {
        &self.token_issuer
    }
}
