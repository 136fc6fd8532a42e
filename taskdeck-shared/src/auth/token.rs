/// Session-token signing and validation
///
/// Session tokens are HS256-signed JWTs carrying the user id. A valid
/// signature alone does not authenticate a request: the token must also be
/// present in the user's stored token list, which is what makes logout and
/// logout-all effective immediately.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::token::{sign_session_token, validate_session_token};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-key-that-is-at-least-32-bytes";
/// let user_id = Uuid::new_v4();
///
/// let token = sign_session_token(user_id, secret)?;
/// let claims = validate_session_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error type for session-token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign token
    #[error("Failed to sign token: {0}")]
    SignError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token failed validation
    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// How long a session token stays verifiable.
///
/// Revocation normally happens through the stored token list; the expiry is
/// an upper bound on abandoned sessions.
const SESSION_TOKEN_DAYS: i64 = 7;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Creates claims for a new session starting now.
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::days(SESSION_TOKEN_DAYS)).timestamp(),
        }
    }
}

/// Signs a new session token for a user.
///
/// # Errors
///
/// Returns `TokenError::SignError` if encoding fails
pub fn sign_session_token(user_id: Uuid, secret: &str) -> Result<String, TokenError> {
    let claims = SessionClaims::new(user_id);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::SignError(e.to_string()))
}

/// Validates a session token's signature and expiry, returning its claims.
///
/// Callers must still check that the token appears in the user's stored
/// token list before treating the request as authenticated.
///
/// # Errors
///
/// - `TokenError::Expired` when past the `exp` claim
/// - `TokenError::Invalid` for a bad signature or malformed token
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionClaims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid(e.to_string()),
    })?;

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_sign_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = sign_session_token(user_id, SECRET).unwrap();

        let claims = validate_session_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = sign_session_token(Uuid::new_v4(), SECRET).unwrap();
        let err = validate_session_token(&token, "another-secret-also-32-bytes-long!").unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let err = validate_session_token("not.a.token", SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = SessionClaims {
            sub: Uuid::new_v4(),
            iat: Utc::now().timestamp() - 120,
            exp: Utc::now().timestamp() - 100,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = validate_session_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }
}
