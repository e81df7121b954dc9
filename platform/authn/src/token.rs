use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, token_ttl_minutes: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl_minutes,
        }
    }

    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(self.jwt_secret.as_bytes())
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.jwt_secret.as_bytes())
    }
}

/// Access token claims. `jti` is unique per issued token and is the key
/// used by the revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub jti: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp as i64, 0).unwrap_or_else(Utc::now)
    }
}

pub fn issue_token(user_id: i32, config: &AuthConfig) -> jsonwebtoken::errors::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(Duration::minutes(config.token_ttl_minutes))
        .unwrap_or(now)
        .timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        jti: Uuid::new_v4().to_string(),
        exp,
        iat: now.timestamp() as usize,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &config.encoding_key())
}

pub fn decode_token(token: &str, config: &AuthConfig) -> jsonwebtoken::errors::Result<Claims> {
    jsonwebtoken::decode::<Claims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_with_unique_ids() {
        let config = AuthConfig::new("test-secret", 5);
        let first = issue_token(7, &config).expect("token");
        let second = issue_token(7, &config).expect("token");
        let a = decode_token(&first, &config).expect("claims");
        let b = decode_token(&second, &config).expect("claims");
        assert_eq!(a.sub, 7);
        assert_ne!(a.jti, b.jti);
        assert!(a.expires_at() > Utc::now());
    }

    #[test]
    fn rejects_foreign_signature() {
        let issued = issue_token(1, &AuthConfig::new("one", 5)).expect("token");
        assert!(decode_token(&issued, &AuthConfig::new("two", 5)).is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        // Past the default 60s validation leeway.
        let config = AuthConfig::new("test-secret", -5);
        let issued = issue_token(1, &config).expect("token");
        assert!(decode_token(&issued, &config).is_err());
    }
}
