use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an access token.
///
/// `sub` is the numeric user id. It travels as a decimal string, the
/// StringOrURI form RFC 7519 expects, and is decoded back into an integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    #[serde(with = "subject")]
    pub sub: i64,

    /// Username at issuance time
    pub username: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a user, valid for `lifetime` starting at `now`.
    pub fn for_user(
        user_id: i64,
        username: impl Into<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let expiration = now + lifetime;

        Self {
            sub: user_id,
            username: username.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

mod subject {
    use serde::de::Error;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(sub: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(sub)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom(format!("subject is not a user id: {raw}")))
    }
}
