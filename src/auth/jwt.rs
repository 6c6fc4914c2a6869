use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::JwtConfig;

const SECONDS_PER_DAY: i64 = 86_400;

/// JWT claims carried by every access token.
///
/// `sub` holds the user id as a decimal string, `iat` and `exp` are Unix
/// timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Parse the subject back into a user id.
    #[must_use]
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }
}

/// Issue an HS256 access token for `user_id`, valid for
/// `jwt.expiration_days` days.
///
/// # Errors
/// Returns `jsonwebtoken::errors::Error` if token encoding fails
pub fn generate_token(
    config: &JwtConfig,
    user_id: i32,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let lifetime = i64::try_from(config.expiration_days)
        .unwrap_or(i64::MAX / SECONDS_PER_DAY)
        .saturating_mul(SECONDS_PER_DAY);

    let claims = Claims {
        sub: user_id.to_string(),
        exp: now.saturating_add(lifetime),
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
/// Returns `jsonwebtoken::errors::Error` if token is invalid, expired, or malformed
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_days: 1,
        }
    }

    #[test]
    fn token_round_trips_the_user_id() {
        let config = config("test-secret");
        let token = generate_token(&config, 42).expect("token should encode");
        let claims = verify_token(&config, &token).expect("token should verify");

        assert_eq!(claims.user_id(), Some(42));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = generate_token(&config("one"), 7).expect("token should encode");

        assert!(verify_token(&config("two"), &token).is_err());
    }

    #[test]
    fn non_numeric_subject_has_no_user_id() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            exp: 0,
            iat: 0,
        };

        assert_eq!(claims.user_id(), None);
    }
}
