use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bearer token claims. `sub` is the principal's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(with = "subject")]
    pub sub: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT secret not configured")]
    InvalidSecret,

    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

/// HS256 signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    leeway_secs: u64,
}

impl JwtKeys {
    pub fn from_secret(secret: &str, leeway_secs: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
        })
    }

    pub fn generate(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding).map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Decode and check signature and expiry
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.leeway = self.leeway_secs;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

/// Mint a token for `user_id` valid for `ttl`
pub fn generate_jwt(keys: &JwtKeys, user_id: i64, ttl: Duration) -> Result<String, JwtError> {
    keys.generate(&Claims::new(user_id, ttl))
}

// `sub` is a string per RFC 7519, but some issuers emit the numeric id directly
mod subject {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    pub fn serialize<S: Serializer>(sub: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&sub.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Int(id) => Ok(id),
            Raw::Str(s) => s
                .parse()
                .map_err(|_| de::Error::custom(format!("subject '{}' is not a user id", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_user_id() {
        let keys = JwtKeys::from_secret("test-secret", 0).unwrap();
        let token = generate_jwt(&keys, 42, Duration::hours(1)).unwrap();
        assert_eq!(keys.validate(&token).unwrap().sub, 42);
    }

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(JwtKeys::from_secret("", 0), Err(JwtError::InvalidSecret)));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::from_secret("test-secret", 0).unwrap();
        let token = generate_jwt(&keys, 1, Duration::hours(-1)).unwrap();
        assert!(matches!(keys.validate(&token), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_foreign_signature() {
        let ours = JwtKeys::from_secret("ours", 0).unwrap();
        let theirs = JwtKeys::from_secret("theirs", 0).unwrap();
        let token = generate_jwt(&theirs, 1, Duration::hours(1)).unwrap();
        assert!(ours.validate(&token).is_err());
    }

    #[test]
    fn accepts_numeric_subject() {
        let claims: Claims = serde_json::from_value(serde_json::json!({
            "sub": 7, "exp": 0, "iat": 0
        }))
        .unwrap();
        assert_eq!(claims.sub, 7);
    }
}
