//! JWT Service Module
//!
//! Minting and verification of the self-issued access/refresh token pair.
//! Access and refresh tokens are signed with separate HS256 secrets so a
//! leaked access secret cannot be used to forge refresh tokens.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::{Claims, RefreshClaims, TOKEN_ISSUER};
use crate::config::Config;
use crate::error::ApiError;

/// A freshly minted access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct JwtService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
}

impl JwtService {
    pub fn new(config: &Config) -> Result<Self> {
        if config.jwt_access_secret.len() < 32 || config.jwt_refresh_secret.len() < 32 {
            anyhow::bail!("JWT secrets must be at least 32 bytes");
        }

        Ok(Self {
            access_encoding: EncodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.jwt_access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.jwt_refresh_secret.as_bytes()),
            access_ttl: config.access_token_ttl,
            refresh_ttl: config.refresh_token_ttl,
        })
    }

    /// Mint a new access/refresh pair for a user.
    pub fn mint_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: Option<String>,
    ) -> Result<TokenPair, ApiError> {
        let access_claims = Claims::new(user_id, email.to_string(), role, self.access_ttl);
        let refresh_claims = RefreshClaims::new(user_id, email.to_string(), self.refresh_ttl);

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign access token: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign refresh token: {}", e)))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token by signature and expiry.
    pub fn decode_access(&self, token: &str) -> Result<Claims, ApiError> {
        let data = decode::<Claims>(token, &self.access_decoding, &validation())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(data.claims)
    }

    /// Verify a refresh token by signature and expiry. No reuse detection is
    /// performed; a verifying, unexpired token is accepted.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, ApiError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &validation())
            .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

        Ok(data.claims)
    }

    pub fn access_ttl(&self) -> i64 {
        self.access_ttl
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn test_config() -> Config {
        Config {
            environment: "test".to_string(),
            port: 0,
            database_url: String::new(),
            jwt_access_secret: "access-secret-access-secret-access-secret".to_string(),
            jwt_refresh_secret: "refresh-secret-refresh-secret-refresh-secret".to_string(),
            access_token_ttl: 900,
            refresh_token_ttl: 604_800,
            allowed_origins: vec![],
            shipping_fee: Decimal::new(50, 0),
            max_connections: 1,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn mints_and_verifies_a_pair() {
        let service = JwtService::new(&test_config()).unwrap();
        let user_id = Uuid::new_v4();

        let pair = service
            .mint_pair(user_id, "buyer@example.com", Some("user".to_string()))
            .unwrap();

        let access = service.decode_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user_id);
        assert_eq!(access.role.as_deref(), Some("user"));

        let refresh = service.decode_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user_id);
    }

    #[test]
    fn access_token_is_rejected_as_refresh_token() {
        // Different secrets: an access token must never pass refresh checks.
        let service = JwtService::new(&test_config()).unwrap();
        let pair = service
            .mint_pair(Uuid::new_v4(), "buyer@example.com", None)
            .unwrap();

        assert!(service.decode_refresh(&pair.access_token).is_err());
        assert!(service.decode_access(&pair.refresh_token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtService::new(&test_config()).unwrap();
        let pair = service
            .mint_pair(Uuid::new_v4(), "buyer@example.com", None)
            .unwrap();

        let mut tampered = pair.access_token.clone();
        tampered.push('x');
        assert!(service.decode_access(&tampered).is_err());
    }

    #[test]
    fn short_secrets_are_rejected() {
        let mut config = test_config();
        config.jwt_access_secret = "short".to_string();
        assert!(JwtService::new(&config).is_err());
    }
}
