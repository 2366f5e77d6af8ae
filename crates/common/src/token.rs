//! Access-token issue and verification.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Expiry as unix seconds.
    pub exp: i64,
    /// Issued-at as unix seconds.
    pub iat: i64,
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenIssuer {
    /// Create a new issuer from the shared secret.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for a user id.
    pub fn issue(&self, user_id: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + i64::try_from(self.ttl_secs).unwrap_or(i64::MAX),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Expired or malformed tokens map to [`AppError::Unauthorized`].
    pub fn verify(&self, token: &str) -> AppResult<AccessClaims> {
        decode::<AccessClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let token = issuer.issue("user1").unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let result = issuer.verify("not.a.token");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new("secret-a", 3600);
        let other = TokenIssuer::new("secret-b", 3600);

        let token = issuer.issue("user1").unwrap();
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized)));
    }
}
