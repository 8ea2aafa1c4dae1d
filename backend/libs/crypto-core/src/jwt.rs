/// Shared JWT module for the blog backend
///
/// Tokens are signed with HS256 using a single shared secret. The secret is
/// installed once at startup and never modified afterwards.
///
/// ## Usage
///
/// ```rust,no_run
/// use crypto_core::jwt;
///
/// let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET required");
/// jwt::initialize_jwt_secret(&secret, 720).expect("Failed to initialize JWT secret");
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 30;

/// JWT algorithm
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT claims issued to an authenticated user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Email address at issuance
    pub email: String,
    /// Display name at issuance
    pub name: String,
    /// Role at issuance ("user" or "admin")
    pub role: String,
}

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

// ============================================================================
// Key Storage
// ============================================================================

static JWT_KEYS: OnceCell<JwtKeys> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Install the signing secret.
///
/// MUST be called during application startup before any JWT operations.
/// Can only be called once - subsequent calls return an error.
pub fn initialize_jwt_secret(secret: &str, ttl_hours: i64) -> Result<()> {
    if secret.is_empty() {
        return Err(anyhow!("JWT secret must not be empty"));
    }

    let ttl_hours = if ttl_hours > 0 {
        ttl_hours
    } else {
        DEFAULT_TOKEN_TTL_HOURS
    };

    JWT_KEYS
        .set(JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        })
        .map_err(|_| anyhow!("JWT secret already initialized"))
}

fn keys() -> Result<&'static JwtKeys> {
    JWT_KEYS.get().ok_or_else(|| {
        anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate an access token for a user
pub fn generate_access_token(user_id: Uuid, email: &str, name: &str, role: &str) -> Result<String> {
    let keys = keys()?;
    let now = Utc::now();
    let expiry = now + Duration::hours(keys.ttl_hours);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        email: email.to_string(),
        name: name.to_string(),
        role: role.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, &keys.encoding)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token (without the "Bearer " prefix).
///
/// Fails if the signature is invalid, the token is expired or malformed, or
/// the secret has not been initialized.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let keys = keys()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))
}

/// Extract user ID from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "crypto-core-test-secret";

    fn init_test_secret() {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            initialize_jwt_secret(TEST_SECRET, 1).expect("Failed to initialize test secret");
        });
    }

    #[test]
    fn test_generate_access_token() {
        init_test_secret();

        let token = generate_access_token(Uuid::new_v4(), "test@example.com", "tester", "user")
            .expect("Failed to generate token");
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_valid_token() {
        init_test_secret();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com", "tester", "admin")
            .expect("Failed to generate token");

        let token_data = validate_token(&token).expect("token should validate");
        assert_eq!(token_data.claims.sub, user_id.to_string());
        assert_eq!(token_data.claims.email, "test@example.com");
        assert_eq!(token_data.claims.role, "admin");
        assert!(token_data.claims.exp > token_data.claims.iat);
    }

    #[test]
    fn test_validate_invalid_token() {
        init_test_secret();
        assert!(validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_validate_token_signed_with_other_secret() {
        init_test_secret();

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            email: "x@example.com".into(),
            name: "x".into(),
            role: "admin".into(),
        };
        let forged = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(b"someone-else"),
        )
        .unwrap();

        assert!(validate_token(&forged).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        init_test_secret();

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
            email: "old@example.com".into(),
            name: "old".into(),
            role: "user".into(),
        };
        let expired = encode(
            &Header::new(JWT_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&expired).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        init_test_secret();

        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, "test@example.com", "tester", "user").unwrap();
        assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_second_initialization_fails() {
        init_test_secret();
        assert!(initialize_jwt_secret("another", 1).is_err());
    }
}
