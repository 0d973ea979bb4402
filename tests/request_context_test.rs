mod common;

use common::{setup_app_data, token_for};
use poem::Request;
use restaurant_access::types::internal::context::{RequestContext, RequestSource};
use restaurant_access::types::internal::{Principal, PrincipalRole};
use std::net::IpAddr;

#[test]
fn test_request_context_new_defaults_to_api_source() {
    let ctx = RequestContext::new();

    assert_eq!(ctx.source, RequestSource::API);
    assert_eq!(ctx.actor_id, "unknown");
    assert!(!ctx.is_authenticated());
    assert!(ctx.principal().is_none());
}

#[test]
fn test_request_context_for_cli() {
    let ctx = RequestContext::for_cli("assign");

    assert_eq!(ctx.source, RequestSource::CLI);
    assert_eq!(ctx.actor_id, "cli:assign");
    assert_eq!(ctx.actor_principal_id(), None);
}

#[test]
fn test_request_context_for_system() {
    let ctx = RequestContext::for_system("cleanup");

    assert_eq!(ctx.source, RequestSource::System);
    assert_eq!(ctx.actor_id, "system:cleanup");
    assert!(ctx.ip_address.is_none());
    assert!(!ctx.is_authenticated());
}

#[test]
fn test_request_context_with_principal_sets_actor() {
    let ctx = RequestContext::new().with_principal(Principal::new(42, [PrincipalRole::Staff]));

    assert!(ctx.is_authenticated());
    assert_eq!(ctx.actor_id, "42");
    assert_eq!(ctx.actor_principal_id(), Some(42));
}

#[test]
fn test_request_context_with_ip_address() {
    let ip: IpAddr = "192.168.1.1".parse().unwrap();
    let ctx = RequestContext::new().with_ip_address(ip);

    assert_eq!(ctx.ip_address, Some(ip));
    assert_eq!(ctx.source, RequestSource::API);
}

#[test]
fn test_request_ids_are_unique() {
    assert_ne!(RequestContext::new().request_id, RequestContext::new().request_id);
}

#[test]
fn test_extract_ip_prefers_forwarded_header() {
    let req = Request::builder()
        .header("X-Forwarded-For", "10.0.0.1, 10.0.0.2")
        .header("X-Real-IP", "10.0.0.3")
        .finish();

    assert_eq!(RequestContext::extract_ip_address(&req), Some("10.0.0.1".parse().unwrap()));
}

#[test]
fn test_extract_ip_falls_back_to_real_ip() {
    let req = Request::builder().header("X-Real-IP", "10.0.0.3").finish();

    assert_eq!(RequestContext::extract_ip_address(&req), Some("10.0.0.3".parse().unwrap()));
}

#[tokio::test]
async fn test_from_request_with_valid_bearer_token() {
    let app_data = setup_app_data(&[]).await;
    let token = token_for(&app_data.token_provider, 9, &[PrincipalRole::RestaurantManager]);
    let req = Request::builder()
        .header("Authorization", format!("Bearer {}", token))
        .finish();

    let ctx = RequestContext::from_request(&req, &app_data.token_provider);

    let principal = ctx.principal().expect("principal should be present");
    assert_eq!(principal.id(), 9);
    assert!(principal.has_role(PrincipalRole::RestaurantManager));
}

#[tokio::test]
async fn test_from_request_with_invalid_token_is_unauthenticated() {
    let app_data = setup_app_data(&[]).await;
    let req = Request::builder()
        .header("Authorization", "Bearer not-a-real-token")
        .finish();

    let ctx = RequestContext::from_request(&req, &app_data.token_provider);

    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.actor_id, "unknown");
}
