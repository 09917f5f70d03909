//! Role resolution.
//!
//! A caller's role can live in three places, checked in priority order:
//! the token `role` claim, the token `user_metadata.role` field, and the
//! `users.role` profile column. First match wins; the profile table is only
//! queried when both token sources are absent. The cascade exists because
//! token metadata can be stale relative to the profile row.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::Claims;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Seller,
    Admin,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Role::User),
            "seller" => Some(Role::Seller),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

/// Resolve a role from the two token-borne sources only.
pub fn role_from_claims(claims: &Claims) -> Option<Role> {
    if let Some(ref role) = claims.role {
        return Role::parse(role);
    }

    claims
        .user_metadata
        .as_ref()
        .and_then(|meta| meta.get("role"))
        .and_then(|v| v.as_str())
        .and_then(Role::parse)
}

/// The full cascade given an already-fetched profile role. Token sources
/// still win; the profile value is the last resort.
fn resolve_with_profile(claims: &Claims, profile_role: Option<&str>) -> Option<Role> {
    role_from_claims(claims).or_else(|| profile_role.and_then(Role::parse))
}

/// Resolve a role through the full cascade. The profile row is consulted
/// only when neither token source yields a role.
pub async fn resolve_role(claims: &Claims, db: &PgPool) -> Result<Option<Role>, ApiError> {
    if let Some(role) = role_from_claims(claims) {
        return Ok(Some(role));
    }

    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
        .bind(claims.sub)
        .fetch_optional(db)
        .await
        .map_err(ApiError::Database)?;

    Ok(resolve_with_profile(
        claims,
        row.as_ref().map(|(role,)| role.as_str()),
    ))
}

fn admin_gate(role: Option<Role>) -> Result<(), ApiError> {
    match role {
        Some(Role::Admin) => Ok(()),
        _ => Err(ApiError::Forbidden("Admin access required".to_string())),
    }
}

fn seller_gate(role: Option<Role>) -> Result<(), ApiError> {
    match role {
        Some(Role::Seller) => Ok(()),
        _ => Err(ApiError::Forbidden("Seller access required".to_string())),
    }
}

/// Deny with 403 unless the caller resolves to admin.
pub async fn require_admin(claims: &Claims, db: &PgPool) -> Result<(), ApiError> {
    admin_gate(resolve_role(claims, db).await?)
}

/// Deny with 403 unless the caller resolves to seller.
pub async fn require_seller(claims: &Claims, db: &PgPool) -> Result<(), ApiError> {
    seller_gate(resolve_role(claims, db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn claims(role: Option<&str>, metadata: Option<serde_json::Value>) -> Claims {
        let mut claims = Claims::new(
            Uuid::new_v4(),
            "someone@example.com".to_string(),
            role.map(|r| r.to_string()),
            900,
        );
        claims.user_metadata = metadata;
        claims
    }

    #[test]
    fn role_claim_wins_over_metadata() {
        let c = claims(Some("admin"), Some(json!({ "role": "user" })));
        assert_eq!(role_from_claims(&c), Some(Role::Admin));
    }

    #[test]
    fn metadata_role_used_when_claim_absent() {
        let c = claims(None, Some(json!({ "role": "admin" })));
        assert_eq!(role_from_claims(&c), Some(Role::Admin));
    }

    #[test]
    fn no_token_source_yields_none() {
        // The caller falls through to the profile lookup in resolve_role.
        let c = claims(None, None);
        assert_eq!(role_from_claims(&c), None);

        let c = claims(None, Some(json!({ "plan": "free" })));
        assert_eq!(role_from_claims(&c), None);
    }

    #[test]
    fn unknown_role_strings_resolve_to_none() {
        let c = claims(Some("superuser"), None);
        assert_eq!(role_from_claims(&c), None);
    }

    #[test]
    fn profile_row_is_the_last_resort() {
        // No token role anywhere: the profile column decides.
        let c = claims(None, None);
        assert_eq!(resolve_with_profile(&c, Some("admin")), Some(Role::Admin));
        assert_eq!(resolve_with_profile(&c, Some("courier")), None);
        assert_eq!(resolve_with_profile(&c, None), None);
    }

    #[test]
    fn token_role_wins_over_profile_row() {
        let c = claims(Some("seller"), None);
        assert_eq!(resolve_with_profile(&c, Some("admin")), Some(Role::Seller));
    }

    #[test]
    fn missing_role_everywhere_is_denied() {
        let c = claims(None, None);
        let resolved = resolve_with_profile(&c, None);
        assert!(matches!(admin_gate(resolved), Err(ApiError::Forbidden(_))));
        assert!(matches!(seller_gate(resolved), Err(ApiError::Forbidden(_))));
    }

    #[test]
    fn gates_admit_only_their_own_role() {
        assert!(admin_gate(Some(Role::Admin)).is_ok());
        assert!(admin_gate(Some(Role::Seller)).is_err());
        assert!(seller_gate(Some(Role::Seller)).is_ok());
        assert!(seller_gate(Some(Role::User)).is_err());
    }

    #[test]
    fn role_parse_round_trips() {
        for role in [Role::User, Role::Seller, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(""), None);
    }
}
