use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Claim set carried by every access token: subject username, numeric user
/// id, absolute expiry (Unix seconds). Client-held, never stored server-side;
/// re-validated on each request. There is no revocation list, a token stays
/// valid until `exp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub id: i64,
    pub exp: i64,
}

// Decode target with optional identity fields so a signed token missing
// `sub` or `id` can be told apart from a forged one.
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: Option<String>,
    id: Option<i64>,
    #[allow(dead_code)]
    exp: i64,
}

/// Token verification failures. Both are reported to HTTP callers as the
/// same 401, nothing distinguishes an expired token from a forged one.
#[derive(Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, structurally malformed, or expired.
    InvalidToken,
    /// Valid signature but `sub` or `id` is absent.
    MissingClaims,
}

pub fn create_access_token(
    secret: &str,
    username: &str,
    user_id: i64,
    expires_in: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: username.to_string(),
        id: user_id,
        exp: (Utc::now() + expires_in).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // no leeway: an expired token fails the moment `exp` passes
    validation.leeway = 0;
    let data = decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| TokenError::InvalidToken)?;

    match (data.claims.sub, data.claims.id) {
        (Some(sub), Some(id)) => Ok(Claims {
            sub,
            id,
            exp: data.claims.exp,
        }),
        _ => Err(TokenError::MissingClaims),
    }
}

/// Salted one-way digest of a password. The plaintext is never stored.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

/// Returns false on a mismatch; errors only when the stored digest itself is
/// malformed.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test-signing-secret-at-least-32-bytes";

    #[test]
    fn password_roundtrip() {
        let digest = hash_password("s3cret-password").unwrap();
        assert_ne!(digest, "s3cret-password");
        assert!(verify_password("s3cret-password", &digest).unwrap());
        assert!(!verify_password("wrong-password", &digest).unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error_not_a_match() {
        assert!(verify_password("anything", "not-a-bcrypt-digest").is_err());
    }

    #[test]
    fn token_roundtrip() {
        let token =
            create_access_token(SECRET, "moussabah", 3, Duration::minutes(30)).unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "moussabah");
        assert_eq!(claims.id, 3);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected_immediately() {
        // exp one second in the past; with zero leeway this fails at once
        let token =
            create_access_token(SECRET, "moussabah", 3, Duration::seconds(-1)).unwrap();
        assert_eq!(decode_token(SECRET, &token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token =
            create_access_token(SECRET, "moussabah", 3, Duration::minutes(30)).unwrap();
        assert_eq!(
            decode_token("another-secret", &token),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert_eq!(
            decode_token(SECRET, "definitely.not.a-jwt"),
            Err(TokenError::InvalidToken)
        );
    }

    #[test]
    fn valid_signature_without_identity_claims_is_rejected() {
        // signed claim set missing `id`
        let exp = (Utc::now() + Duration::minutes(30)).timestamp();
        let payload = json!({ "sub": "moussabah", "exp": exp });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert_eq!(decode_token(SECRET, &token), Err(TokenError::MissingClaims));
    }
}
