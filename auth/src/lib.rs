//! Authentication primitives for the account service.
//!
//! - Password hashing (Argon2id)
//! - HS256 access token issuance and validation
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password").is_ok());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{SigningKey, TokenIssuer, TokenValidator};
//! use chrono::Duration;
//!
//! let key = SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issuer = TokenIssuer::new(&key, Duration::hours(24)).unwrap();
//! let validator = TokenValidator::new(&key);
//!
//! let token = issuer.generate(1, "alice").unwrap();
//! let claims = validator.validate(&token).unwrap();
//! assert_eq!(claims.sub, 1);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(24)).unwrap();
//!
//! let hash = auth.hash_password("password123").unwrap();
//! let result = auth.authenticate("password123", &hash, 1, "alice").unwrap();
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.username, "alice");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::SigningKey;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenValidator;
pub use token::ValidationError;
