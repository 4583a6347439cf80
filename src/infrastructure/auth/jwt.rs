//! JWT access/refresh token generation and validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use uuid::Uuid;

use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Which endpoint family a token is good for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Access => write!(f, "access"),
            TokenType::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub token_type: TokenType,
    /// Unique token id
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    pub fn new(user: &User, token_type: TokenType, lifetime: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// User ID carried in `sub`
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub
            .parse()
            .map_err(|_| DomainError::unauthorized("Token subject is not a user id"))
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_access_token_minutes(mut self, minutes: i64) -> Self {
        self.access_token_minutes = minutes;
        self
    }

    pub fn with_refresh_token_hours(mut self, hours: i64) -> Self {
        self.refresh_token_hours = hours;
        self
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_token_minutes: 5,
            refresh_token_hours: 24,
        }
    }
}

/// An access token with its companion refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a token of the given type for a user
    fn generate(&self, user: &User, token_type: TokenType) -> Result<String, DomainError>;

    /// Validate a token, requiring the given type, and return its claims
    fn validate(&self, token: &str, expected: TokenType) -> Result<JwtClaims, DomainError>;

    /// Generate the login pair
    fn generate_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        Ok(TokenPair {
            refresh: self.generate(user, TokenType::Refresh)?,
            access: self.generate(user, TokenType::Access)?,
        })
    }
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_minutes", &self.config.access_token_minutes)
            .field("refresh_token_hours", &self.config.refresh_token_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn lifetime(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => Duration::minutes(self.config.access_token_minutes),
            TokenType::Refresh => Duration::hours(self.config.refresh_token_hours),
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User, token_type: TokenType) -> Result<String, DomainError> {
        let claims = JwtClaims::new(user, token_type, self.lifetime(token_type));

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str, expected: TokenType) -> Result<JwtClaims, DomainError> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))?
            .claims;

        if claims.token_type != expected {
            return Err(DomainError::unauthorized(format!(
                "Expected {} token, got {} token",
                expected, claims.token_type
            )));
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;

    fn create_test_user() -> User {
        NewUser::new("admin", "hashed_password").into_user(7)
    }

    fn create_service() -> JwtService {
        JwtService::new(JwtConfig::new("test-secret-key-12345"))
    }

    #[test]
    fn test_generate_and_validate_access() {
        let service = create_service();
        let token = service.generate(&create_test_user(), TokenType::Access).unwrap();

        let claims = service.validate(&token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_access_lifetime_is_minutes() {
        let service = create_service();
        let token = service.generate(&create_test_user(), TokenType::Access).unwrap();

        let claims = service.validate(&token, TokenType::Access).unwrap();
        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn test_refresh_lifetime_is_hours() {
        let service = create_service();
        let token = service.generate(&create_test_user(), TokenType::Refresh).unwrap();

        let claims = service.validate(&token, TokenType::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let service = create_service();
        let pair = service.generate_pair(&create_test_user()).unwrap();

        let result = service.validate(&pair.refresh, TokenType::Access);
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));

        let result = service.validate(&pair.access, TokenType::Refresh);
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[test]
    fn test_pair_tokens_have_distinct_ids() {
        let service = create_service();
        let pair = service.generate_pair(&create_test_user()).unwrap();

        let access = service.validate(&pair.access, TokenType::Access).unwrap();
        let refresh = service.validate(&pair.refresh, TokenType::Refresh).unwrap();
        assert_ne!(access.jti, refresh.jti);
    }

    #[test]
    fn test_invalid_token() {
        let service = create_service();

        let result = service.validate("invalid-token", TokenType::Access);
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new(JwtConfig::new("secret-1"));
        let service2 = JwtService::new(JwtConfig::new("secret-2"));

        let token = service1.generate(&create_test_user(), TokenType::Access).unwrap();

        assert!(service2.validate(&token, TokenType::Access).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig::new("test-secret"));

        let past_time = Utc::now() - Duration::hours(1);
        let claims = JwtClaims {
            sub: "7".to_string(),
            username: "admin".to_string(),
            token_type: TokenType::Access,
            jti: Uuid::new_v4().to_string(),
            iat: (past_time - Duration::hours(2)).timestamp(),
            exp: past_time.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(service.validate(&token, TokenType::Access).is_err());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = JwtClaims {
            sub: "admin".to_string(),
            username: "admin".to_string(),
            token_type: TokenType::Access,
            jti: Uuid::new_v4().to_string(),
            iat: 0,
            exp: 0,
        };

        assert!(claims.user_id().is_err());
    }

    #[test]
    fn test_configured_lifetimes() {
        let service = JwtService::new(
            JwtConfig::new("secret")
                .with_access_token_minutes(15)
                .with_refresh_token_hours(48),
        );

        assert_eq!(service.lifetime(TokenType::Access), Duration::minutes(15));
        assert_eq!(service.lifetime(TokenType::Refresh), Duration::hours(48));
    }
}
