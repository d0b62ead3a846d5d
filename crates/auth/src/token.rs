//! Token service: issues and validates signed access/refresh tokens.
//!
//! Tokens are stateless. Validity is decided by signature and expiry alone;
//! the only server-side lookup is resolving the embedded user id, so a token
//! for a deleted user stops working.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use tracing::debug;
use uuid::Uuid;

use crate::{Identity, TokenClaims, TokenError, TokenType, UserDirectory, validate_claims};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Signing configuration, injected at construction.
#[derive(Clone)]
pub struct TokenSettings {
    pub secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenSettings {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(30),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }
}

impl core::fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Freshly issued token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Resolves a bearer credential to an identity.
///
/// This is the seam the transport layer depends on, so it never needs to
/// know the token format or the user store behind it.
pub trait BearerAuthenticator: Send + Sync {
    fn authenticate_bearer(&self, token: &str) -> Result<Identity, TokenError>;
}

pub struct TokenService<D> {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    directory: D,
}

impl<D> TokenService<D>
where
    D: UserDirectory,
{
    pub fn new(settings: TokenSettings, directory: D) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked by `validate_claims` against an explicit clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&settings.secret),
            decoding_key: DecodingKey::from_secret(&settings.secret),
            validation,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            directory,
        }
    }

    /// Issue an access/refresh pair for an identity.
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(identity, TokenType::Access, now)?,
            refresh_token: self.sign(identity, TokenType::Refresh, now)?,
        })
    }

    /// Validate an access token and resolve the live identity behind it.
    pub fn authenticate(&self, token: &str) -> Result<Identity, TokenError> {
        self.authenticate_at(token, Utc::now())
    }

    pub fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let claims = self.decode_checked(token, TokenType::Access, now)?;
        self.resolve(&claims)
    }

    /// Exchange a refresh token for a new access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        self.refresh_at(refresh_token, Utc::now())
    }

    pub fn refresh_at(&self, refresh_token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = self.decode_checked(refresh_token, TokenType::Refresh, now)?;
        let identity = self.resolve(&claims)?;
        self.sign(&identity, TokenType::Access, now)
    }

    fn sign(&self, identity: &Identity, token_type: TokenType, now: DateTime<Utc>) -> Result<String, TokenError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing(format!("{token_type} token lifetime out of range")))?;
        let claims = TokenClaims {
            user_id: identity.user_id,
            username: identity.username.clone(),
            token_type,
            iat: now,
            exp,
            jti: Uuid::now_v7(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Signature, then time window, then token type.
    fn decode_checked(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token.trim(), &self.decoding_key, &self.validation)
            .map_err(|e| {
                let err = classify(e.kind());
                debug!(error = %e, kind = ?err, "token rejected");
                err
            })?
            .claims;

        validate_claims(&claims, now)?;

        if claims.token_type != expected {
            debug!(user_id = %claims.user_id, got = %claims.token_type, want = %expected, "token rejected");
            return Err(TokenError::WrongTokenType);
        }
        Ok(claims)
    }

    fn resolve(&self, claims: &TokenClaims) -> Result<Identity, TokenError> {
        let user = self.directory.find_by_id(claims.user_id).ok_or_else(|| {
            debug!(user_id = %claims.user_id, "token refers to a deleted user");
            TokenError::UnknownUser
        })?;
        Ok(Identity::from(&user))
    }
}

impl<D> BearerAuthenticator for TokenService<D>
where
    D: UserDirectory,
{
    fn authenticate_bearer(&self, token: &str) -> Result<Identity, TokenError> {
        self.authenticate(token)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
