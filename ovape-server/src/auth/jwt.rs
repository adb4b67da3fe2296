//! JWT token service
//!
//! Validates the bearer tokens issued by the shop's auth provider and turns
//! their claims into the acting staff member.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::models::{Actor, Role};
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret (at least 32 characters)
    pub secret: String,
    /// Token lifetime for locally issued tokens (minutes)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
    /// Secret was generated at startup instead of loaded from JWT_SECRET
    #[serde(skip)]
    pub generated: bool,
}

impl JwtConfig {
    /// Fixed secret, default issuer and audience
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes: 1440,
            issuer: "ovape-auth".to_string(),
            audience: "ovape-stamp".to_string(),
            generated: false,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        let (secret, generated) = match load_jwt_secret() {
            Ok(secret) => (secret, false),
            Err(e) => {
                tracing::warn!("{}, generating a temporary secret", e);
                (generate_secure_printable_jwt_secret(), true)
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ovape-auth".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ovape-stamp".to_string()),
            generated,
        }
    }
}

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff id (Subject)
    pub sub: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// "admin" or "staff"
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Printable random secret for development runs
pub fn generate_secure_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect()
}

fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= MIN_SECRET_LEN => Ok(secret),
        Ok(_) => Err(JwtError::ConfigError(format!(
            "JWT_SECRET must be at least {} characters long",
            MIN_SECRET_LEN
        ))),
        Err(_) => Err(JwtError::ConfigError("JWT_SECRET not set".to_string())),
    }
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for a staff member
    ///
    /// Production tokens come from the auth provider; this is used by the
    /// local tooling and tests.
    pub fn generate_token(&self, actor: &Actor) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: actor.id.clone(),
            name: actor.name.clone(),
            email: actor.email.clone(),
            role: role_name(actor.role).to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::Admin => "admin",
        Role::Staff => "staff",
    }
}

/// Current user context, resolved from the token by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        // Unknown roles get the least privilege
        let role = match claims.role.as_str() {
            "admin" => Role::Admin,
            _ => Role::Staff,
        };

        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Actor recorded on audit log entries
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}
