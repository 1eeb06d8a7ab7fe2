use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::denylist::TokenDenylist;
use super::domain::{Role, User, UserId};

/// JWT payload carried by every issued access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("token has been revoked")]
    Revoked,
    #[error("token lifetime puts the expiry outside the supported date range")]
    ExpiryOutOfRange,
}

/// HS256 signer/verifier bound to one shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<chrono::Duration>,
}

impl TokenCodec {
    /// A `ttl` too large for chrono makes every `issue` fail with `ExpiryOutOfRange`.
    pub fn new(secret: &str, ttl: std::time::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl: chrono::Duration::from_std(ttl).ok(),
        }
    }

    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = self
            .ttl
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Signing)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Checks signature and expiry against the wall clock.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

/// Verifies bearer tokens and consults the denylist for revocations.
#[derive(Clone)]
pub struct Authenticator {
    codec: TokenCodec,
    denylist: Arc<dyn TokenDenylist>,
}

impl Authenticator {
    pub fn new(codec: TokenCodec, denylist: Arc<dyn TokenDenylist>) -> Self {
        Self { codec, denylist }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn denylist(&self) -> &Arc<dyn TokenDenylist> {
        &self.denylist
    }

    pub fn authenticate(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = self.codec.verify(token)?;
        if self.denylist.is_revoked(token, Utc::now()) {
            debug!(user_id = claims.id.0, "rejected revoked token");
            return Err(TokenError::Revoked);
        }
        Ok(claims)
    }

    /// Revokes `token` until its own expiry; later lookups fall back to signature checks.
    pub fn revoke(&self, token: &str, claims: &Claims) {
        self.denylist.revoke(token, claims.expires_at());
    }
}
