//! Authentication infrastructure module
//!
//! JWT access and refresh tokens for API users.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, TokenPair, TokenType};
