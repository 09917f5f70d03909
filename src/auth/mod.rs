use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod cookies;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod roles;

pub use roles::Role;

pub(crate) const TOKEN_ISSUER: &str = "marketplace-api";

/// Claims carried by self-issued access tokens.
///
/// `role` is embedded at mint time from the profile row. `user_metadata` is
/// a raw metadata blob some accounts carry instead; role resolution falls
/// back to it, then to the profile row itself (see [`roles`]).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: Option<String>, ttl_secs: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email,
            role,
            user_metadata: None,
            exp: (now + chrono::Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Claims carried by refresh tokens. Deliberately minimal: the refresh
/// token only proves identity long enough to mint a fresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

impl RefreshClaims {
    pub fn new(user_id: Uuid, email: String, ttl_secs: i64) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            email,
            exp: (now + chrono::Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }
}
