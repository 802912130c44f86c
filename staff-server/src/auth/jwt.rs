//! JWT token service
//!
//! HS256 tokens carrying the user id, name and role.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{User, UserRole};
use thiserror::Error;

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str, expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry: Duration::hours(expiry_hours),
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: (now + self.expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }

    /// Strip the `Bearer ` prefix of an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Authenticated caller, injected into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("bad subject: {}", claims.sub)))?;
        Ok(Self {
            id,
            username: claims.username,
            role: claims.role,
        })
    }
}
