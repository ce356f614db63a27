//! HS256 access-token verification.
//!
//! Tokens are minted by the identity provider with the user's id in `sub`.
//! The role is never read from the token: it is resolved from the stored
//! profile on every request.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use surveytrack_core::types::DbId;

/// Claims this service relies on. Providers may include more; unknown
/// claims are ignored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's profile id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    #[serde(default)]
    pub iat: i64,
    /// Audience, checked only when [`JwtConfig::audience`] is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Configuration for token validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the identity provider.
    pub secret: String,
    /// Expected `aud` claim, e.g. `authenticated`.
    pub audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var         | Required | Default |
    /// |-----------------|----------|---------|
    /// | `JWT_SECRET`    | **yes**  | --      |
    /// | `JWT_AUDIENCE`  | no       | unset   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let audience = std::env::var("JWT_AUDIENCE")
            .ok()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        Self { secret, audience }
    }
}

/// Sign an HS256 access token for `user_id` valid for `ttl_secs`.
///
/// Production tokens come from the identity provider; this is used by
/// tests and local tooling sharing the same secret.
pub fn generate_access_token(
    user_id: DbId,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + ttl_secs,
        iat: now,
        aud: config.audience.clone(),
        email: None,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Checks the signature and expiration, plus the audience when configured.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default(); // HS256, validates exp
    match &config.audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn config(audience: Option<&str>) -> JwtConfig {
        JwtConfig {
            secret: "test-secret-for-unit-tests".to_string(),
            audience: audience.map(str::to_string),
        }
    }

    #[test]
    fn round_trips_subject() {
        let cfg = config(None);
        let id = Uuid::new_v4();
        let token = generate_access_token(id, 60, &cfg).unwrap();
        assert_eq!(validate_token(&token, &cfg).unwrap().sub, id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(Uuid::new_v4(), 60, &config(None)).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            audience: None,
        };
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let cfg = config(None);
        let token = generate_access_token(Uuid::new_v4(), -3600, &cfg).unwrap();
        assert!(validate_token(&token, &cfg).is_err());
    }

    #[test]
    fn audience_is_enforced_when_configured() {
        let with_aud = config(Some("authenticated"));
        let token = generate_access_token(Uuid::new_v4(), 60, &config(None)).unwrap();
        assert!(validate_token(&token, &with_aud).is_err());

        let token = generate_access_token(Uuid::new_v4(), 60, &with_aud).unwrap();
        assert!(validate_token(&token, &with_aud).is_ok());
    }
}
