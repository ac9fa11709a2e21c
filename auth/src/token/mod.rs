pub mod claims;
pub mod errors;
pub mod issuer;
pub mod key;
pub mod validator;

pub use claims::Claims;
pub use errors::TokenError;
pub use errors::ValidationError;
pub use issuer::TokenIssuer;
pub use key::SigningKey;
pub use validator::TokenValidator;
