use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

/// How the configured signing secret string is turned into HMAC key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretEncoding {
    /// UTF-8 bytes of the string as-is.
    Raw,
    /// Standard base64 of the key bytes (the issuer shares the key this way).
    Base64,
}

#[derive(Debug, Error)]
pub enum ValidatorConfigError {
    #[error("signing secret is empty")]
    EmptySecret,
    #[error("signing secret is not valid base64: {0}")]
    InvalidSecret(#[source] jsonwebtoken::errors::Error),
}

/// Why a token was rejected.
///
/// `Expired` and `InvalidSignature` are kept apart even though both end up as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("unexpected token verification failure")]
    Other,
}

pub type VerificationResult = Result<Claims, TokenError>;

/// Verified access-token claims.
///
/// Only produced by [`TokenValidator::verify`] after the signature and `exp` checked out.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    // Absent `sub` decodes as "" so the filters can report an empty subject on their own.
    #[serde(default)]
    sub: String,
    #[serde(default)]
    auth: Option<String>,
    exp: u64,
}

impl Claims {
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// The authority (role) claim, e.g. `ROLE_ADMIN`.
    pub fn authority(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.exp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// HMAC (HS256/384/512) access-token verifier.
///
/// - Built once at startup and shared read-only behind an `Arc`.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenValidator")
            .field("algorithms", &self.validation.algorithms)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(
        secret: &str,
        encoding: SecretEncoding,
        leeway_seconds: u64,
    ) -> Result<Self, ValidatorConfigError> {
        if secret.is_empty() {
            return Err(ValidatorConfigError::EmptySecret);
        }

        let decoding_key = match encoding {
            SecretEncoding::Raw => DecodingKey::from_secret(secret.as_bytes()),
            SecretEncoding::Base64 => DecodingKey::from_base64_secret(secret)
                .map_err(ValidatorConfigError::InvalidSecret)?,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Verify a raw token (no `Bearer ` prefix) and decode its claims.
    ///
    /// jsonwebtoken checks the signature before it looks at the claim set, so a
    /// forged token is always `InvalidSignature` and never `Expired`.
    pub fn verify(&self, token: &str) -> VerificationResult {
        if token.is_empty() {
            tracing::warn!(kind = ?TokenError::Malformed, "empty bearer token");
            return Err(TokenError::Malformed);
        }

        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => {
                let kind = classify(err.kind());
                match kind {
                    TokenError::Expired => tracing::info!(kind = ?kind, "expired access token"),
                    TokenError::Malformed | TokenError::InvalidSignature => {
                        tracing::warn!(kind = ?kind, error = %err, "access token rejected")
                    }
                    TokenError::Other => tracing::error!(
                        kind = ?kind,
                        error = ?err,
                        "unexpected access token verification failure"
                    ),
                }
                Err(kind)
            }
        }
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidToken
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => TokenError::Malformed,
        _ => TokenError::Other,
    }
}
