use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("signature does not match")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token issued for another issuer or audience")]
    Untrusted,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
                TokenError::Untrusted
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        SessionKeys::new(&state.config.jwt)
    }
}

impl SessionKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
        }
    }

    /// Mints a token for `user_id` that expires `ttl` from now.
    pub fn mint(&self, user_id: Uuid, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "session token signed");
        Ok(token)
    }

    /// Mints a token with the configured session lifetime.
    pub fn sign(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.mint(user_id, self.ttl)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "session token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(secret: &str, issuer: &str, audience: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 60,
        }
    }

    fn keys() -> SessionKeys {
        SessionKeys::new(&cfg("dev-secret", "test-issuer", "test-aud"))
    }

    fn now() -> usize {
        OffsetDateTime::now_utc().unix_timestamp() as usize
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[test]
    fn default_expiry_is_about_an_hour() {
        let keys = keys();
        let claims = keys.verify(&keys.sign(Uuid::new_v4()).unwrap()).unwrap();
        let expected = now() + 3600;
        assert!(claims.exp.abs_diff(expected) <= 5, "exp {} vs {}", claims.exp, expected);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = SessionKeys::new(&cfg("other-secret", "test-issuer", "test-aud"));
        let token = other.sign(Uuid::new_v4()).unwrap();
        assert_eq!(keys().verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now() - 7200,
            exp: now() - 3600,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(keys().verify("not.a.token").unwrap_err(), TokenError::Malformed);
        assert_eq!(keys().verify("").unwrap_err(), TokenError::Malformed);
    }

    #[test]
    fn rejects_wrong_issuer_or_audience() {
        let foreign = SessionKeys::new(&cfg("dev-secret", "elsewhere", "someone-else"));
        let token = foreign.sign(Uuid::new_v4()).unwrap();
        assert_eq!(keys().verify(&token).unwrap_err(), TokenError::Untrusted);
    }
}
