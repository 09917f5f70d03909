//! Session token behaviour through the public API: mint, verify, refresh
//! semantics and the role cascade's token-only fast path.

use marketplace_api::Config;
use marketplace_api::auth::jwt::JwtService;
use marketplace_api::auth::roles::{Role, role_from_claims};
use rust_decimal::Decimal;
use uuid::Uuid;

fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        port: 0,
        database_url: String::new(),
        jwt_access_secret: "integration-access-secret-0123456789ab".to_string(),
        jwt_refresh_secret: "integration-refresh-secret-0123456789a".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 604_800,
        allowed_origins: vec![],
        shipping_fee: Decimal::new(50, 0),
        max_connections: 1,
        log_level: "info".to_string(),
    }
}

#[test]
fn minted_role_survives_the_round_trip() {
    let service = JwtService::new(&test_config()).unwrap();
    let user_id = Uuid::new_v4();

    let pair = service
        .mint_pair(user_id, "seller@example.com", Some("seller".to_string()))
        .unwrap();
    let claims = service.decode_access(&pair.access_token).unwrap();

    // The role rides in the token, so authorization never needs a profile
    // lookup for tokens we minted ourselves.
    assert_eq!(role_from_claims(&claims), Some(Role::Seller));
    assert_eq!(claims.sub, user_id);
}

#[test]
fn metadata_only_tokens_still_resolve_a_role() {
    let service = JwtService::new(&test_config()).unwrap();
    let pair = service
        .mint_pair(Uuid::new_v4(), "admin@example.com", None)
        .unwrap();

    let mut claims = service.decode_access(&pair.access_token).unwrap();
    assert_eq!(role_from_claims(&claims), None);

    claims.user_metadata = Some(serde_json::json!({ "role": "admin" }));
    assert_eq!(role_from_claims(&claims), Some(Role::Admin));
}

#[test]
fn refresh_token_cannot_impersonate_an_access_token() {
    let service = JwtService::new(&test_config()).unwrap();
    let pair = service
        .mint_pair(Uuid::new_v4(), "buyer@example.com", Some("user".to_string()))
        .unwrap();

    assert!(service.decode_access(&pair.refresh_token).is_err());
    assert!(service.decode_refresh(&pair.refresh_token).is_ok());
}

#[test]
fn tokens_from_another_deployment_are_rejected() {
    let service_a = JwtService::new(&test_config()).unwrap();

    let mut other = test_config();
    other.jwt_access_secret = "a-completely-different-access-secret!!".to_string();
    other.jwt_refresh_secret = "a-completely-different-refresh-secret!".to_string();
    let service_b = JwtService::new(&other).unwrap();

    let pair = service_a
        .mint_pair(Uuid::new_v4(), "buyer@example.com", None)
        .unwrap();

    assert!(service_b.decode_access(&pair.access_token).is_err());
    assert!(service_b.decode_refresh(&pair.refresh_token).is_err());
}
