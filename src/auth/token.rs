use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::TOKEN_LIFETIME_SECS;
use crate::error::{ApiError, Result};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a subject, valid for the fixed token lifetime
    pub fn new(subject_id: String) -> Self {
        Self::with_lifetime(subject_id, TOKEN_LIFETIME_SECS)
    }

    /// Creates claims with a custom lifetime in seconds (may be negative
    /// to produce an already-expired token in tests)
    pub fn with_lifetime(subject_id: String, lifetime_secs: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: subject_id,
            iat: now,
            exp: now + lifetime_secs,
        }
    }
}

/// Why a token failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The token could not be parsed or decoded
    Malformed,
    /// The signature does not verify against the active secret
    SignatureInvalid,
    /// The token was valid but its lifetime has elapsed
    Expired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "token is malformed"),
            Self::SignatureInvalid => write!(f, "token signature is invalid"),
            Self::Expired => write!(f, "token has expired"),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Unauthenticated(format!("Not authorized, {}", err))
    }
}

/// Mints and verifies bearer tokens. Pure function of the signing secret
/// and its input; the secret is passed in explicitly at construction and
/// never read from ambient state.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact; no clock leeway
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Produces a signed credential for the subject, valid for 30 days
    pub fn issue(&self, subject_id: &str) -> Result<String> {
        self.sign(&Claims::new(subject_id.to_string()))
    }

    /// Signs arbitrary claims; used by `issue` and by expiry tests
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| ApiError::StorageError(format!("Failed to sign token: {}", e)))
    }

    /// Validates a token and returns the embedded subject identifier.
    /// Callers must re-resolve the full identity from the user store.
    pub fn verify(&self, token: &str) -> std::result::Result<String, TokenError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                    ErrorKind::InvalidSignature => Err(TokenError::SignatureInvalid),
                    _ => Err(TokenError::Malformed),
                }
            }
        }
    }
}

/// Extracts the bearer credential from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_then_verify_round_trips() {
        let issuer = TokenIssuer::new("test-signing-secret");
        let token = issuer.issue("user123").unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), "user123");
    }

    #[test]
    fn garbage_is_malformed() {
        let issuer = TokenIssuer::new("test-signing-secret");
        assert_eq!(
            issuer.verify("not.a.token").unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn wrong_secret_is_signature_invalid() {
        let issuer = TokenIssuer::new("test-signing-secret");
        let other = TokenIssuer::new("a-different-signing-secret");
        let token = issuer.issue("user123").unwrap();
        assert_eq!(
            other.verify(&token).unwrap_err(),
            TokenError::SignatureInvalid
        );
    }

    #[test]
    fn elapsed_lifetime_is_expired() {
        let issuer = TokenIssuer::new("test-signing-secret");
        let claims = Claims::with_lifetime("user123".to_string(), -3600);
        let token = issuer.sign(&claims).unwrap();
        assert_eq!(issuer.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic abc123"), None);
        assert_eq!(extract_bearer_token("abc123"), None);
    }
}
