use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde_json::{Map, Value};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::{auth::claims::Claims, config::JwtConfig, state::AppState};

const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token could not be parsed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            // a token signed under another algorithm is not ours either
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: TimeDuration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> anyhow::Result<Self> {
        Ok(Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm()?,
            ttl: cfg.ttl()?,
        })
    }

    /// Signs `subject` plus auxiliary claims. `ttl` defaults to the configured lifetime.
    pub fn issue(
        &self,
        subject: &str,
        mut extra: Map<String, Value>,
        ttl: Option<TimeDuration>,
    ) -> anyhow::Result<String> {
        extra.retain(|k, _| !RESERVED_CLAIMS.contains(&k.as_str()));
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(ttl.unwrap_or(self.ttl))
            .ok_or_else(|| anyhow::anyhow!("token expiry out of range"))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            extra,
        };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)?;
        debug!(sub = %subject, alg = ?self.algorithm, "jwt signed");
        Ok(token)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(sub = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}
