/// JWT token generation and validation using HS256
/// Tokens identify the user by ObjectId hex in `sub` and stay valid for the
/// configured TTL (365 days by default, matching the login session length).
use anyhow::{anyhow, Result};
use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ObjectId as hex)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Generate a signed token for a user
pub fn generate_token(user_id: ObjectId, secret: &str, ttl_secs: i64) -> Result<String> {
    let now = Utc::now();
    let expiry = now + Duration::seconds(ttl_secs);

    let claims = Claims {
        sub: user_id.to_hex(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
    };

    encode(
        &Header::new(jsonwebtoken::Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Failed to generate token: {}", e))
}

/// Validate and decode a token
pub fn validate_token(token: &str, secret: &str) -> Result<TokenData<Claims>> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    )
    .map_err(|e| anyhow!("Token validation failed: {}", e))
}

/// Extract the user ObjectId from a token
pub fn user_id_from_token(token: &str, secret: &str) -> Result<ObjectId> {
    let token_data = validate_token(token, secret)?;
    ObjectId::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID in token: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const TTL: i64 = 365 * 24 * 3600;

    #[test]
    fn test_generate_token() {
        let user_id = ObjectId::new();
        let token = generate_token(user_id, SECRET, TTL).unwrap();

        assert!(!token.is_empty());
        // JWT tokens have 3 parts separated by dots
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_valid_token() {
        let user_id = ObjectId::new();
        let token = generate_token(user_id, SECRET, TTL).unwrap();

        let token_data = validate_token(&token, SECRET).unwrap();
        assert_eq!(token_data.claims.sub, user_id.to_hex());
        assert!(token_data.claims.exp > token_data.claims.iat);
    }

    #[test]
    fn test_validate_invalid_token() {
        assert!(validate_token("not.a.valid.token", SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_token(ObjectId::new(), SECRET, TTL).unwrap();
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_user_id_round_trip() {
        let user_id = ObjectId::new();
        let token = generate_token(user_id, SECRET, TTL).unwrap();

        assert_eq!(user_id_from_token(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_token_has_configured_expiry() {
        let token = generate_token(ObjectId::new(), SECRET, TTL).unwrap();
        let claims = validate_token(&token, SECRET).unwrap().claims;

        let now = Utc::now().timestamp();
        let expected_expiry = now + TTL;

        // Allow 1 second tolerance for execution time
        assert!(claims.exp >= expected_expiry - 1);
        assert!(claims.exp <= expected_expiry + 1);
    }
}
