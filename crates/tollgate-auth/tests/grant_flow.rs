//! End-to-end grant and validation flow through the public API.

use std::sync::Arc;

use tollgate_auth::endpoint::{
    CheckTokenRequest, ClientAuthBuilder, RequestScope, ResourceAuthBuilder, TokenRequest,
    check_token_endpoint, simple_data, token_endpoint,
};
use tollgate_auth::grant::{PASSWORD_GRANT, REFRESH_TOKEN_GRANT};
use tollgate_auth::prelude::*;
use tollgate_auth::types::SIGNED_TOKEN_TYPE;

struct Harness {
    clients: Arc<InMemoryClientDirectory>,
    service: Arc<TokenService>,
    password_only: CompositeTokenGranter,
    full: CompositeTokenGranter,
}

fn harness(store: TokenStoreKind) -> Harness {
    let config = AuthConfig::default();
    config.validate().unwrap();

    let jwt = Arc::new(JwtService::new(
        config.signing.secret.as_bytes(),
        config.signing_algorithm().unwrap(),
        config.issuer.clone(),
    ));
    let enhancer: Arc<dyn TokenEnhancer> = Arc::new(JwtTokenEnhancer::new(jwt));
    let token_store: Arc<dyn TokenStore> = match store {
        TokenStoreKind::Stateless => Arc::new(JwtTokenStore::new(enhancer.clone())),
        TokenStoreKind::Memory => {
            Arc::new(InMemoryTokenStore::with_enhancer(enhancer.clone()))
        }
    };
    let service = Arc::new(TokenService::new(
        token_store,
        Some(enhancer),
        TokenConfig::new().with_access_token_expiry(config.access_token_expiry),
    ));

    let clients = Arc::new(InMemoryClientDirectory::new(config.clients.clone()).unwrap());
    let users: Arc<dyn UserDirectory> =
        Arc::new(InMemoryUserDirectory::new(config.users.clone()).unwrap());

    let password: Arc<dyn TokenGranter> =
        Arc::new(PasswordTokenGranter::new(users.clone(), service.clone()));
    let refresh: Arc<dyn TokenGranter> = Arc::new(RefreshTokenGranter::new(users, service.clone()));

    Harness {
        clients,
        service,
        password_only: CompositeTokenGranter::new().with_granter(PASSWORD_GRANT, password.clone()),
        full: CompositeTokenGranter::new()
            .with_granter(PASSWORD_GRANT, password)
            .with_granter(REFRESH_TOKEN_GRANT, refresh),
    }
}

async fn client(h: &Harness) -> ClientPrincipal {
    h.clients.authenticate("clientId", "clientSecret").await.unwrap()
}

fn password_params(password: &str) -> GrantParams {
    GrantParams::new()
        .with("username", "admin")
        .with("password", password)
}

#[tokio::test]
async fn password_grant_issues_signed_token_with_refresh() {
    let h = harness(TokenStoreKind::Stateless);
    let token = h
        .password_only
        .grant(PASSWORD_GRANT, &client(&h).await, &password_params("123456"))
        .await
        .unwrap();

    assert_eq!(token.token_type, SIGNED_TOKEN_TYPE);
    assert!(!token.token_value.is_empty());
    assert!(token.refresh_token.is_some());
}

#[tokio::test]
async fn password_grant_with_wrong_password_fails() {
    let h = harness(TokenStoreKind::Stateless);
    let result = h
        .password_only
        .grant(PASSWORD_GRANT, &client(&h).await, &password_params("WRONG"))
        .await;
    assert_eq!(result, Err(AuthError::PasswordMismatch));
}

#[tokio::test]
async fn refresh_grant_without_strategy_is_unsupported() {
    let h = harness(TokenStoreKind::Stateless);
    let params = GrantParams::new().with("refresh_token", "anything");
    let result = h
        .password_only
        .grant(REFRESH_TOKEN_GRANT, &client(&h).await, &params)
        .await;
    assert_eq!(
        result,
        Err(AuthError::unsupported_grant_type(REFRESH_TOKEN_GRANT))
    );
}

#[tokio::test]
async fn issued_token_resolves_to_context_without_secrets() {
    let h = harness(TokenStoreKind::Stateless);
    let token = h
        .full
        .grant(PASSWORD_GRANT, &client(&h).await, &password_params("123456"))
        .await
        .unwrap();

    let context = h
        .service
        .get_authorization_context(&token.token_value)
        .await
        .unwrap();
    assert_eq!(context.user.user_id, 1);
    assert_eq!(context.client.client_id, "clientId");
    assert!(context.user.has_authority("admin"));
    assert!(context.user.password.is_empty());
    assert!(context.client.client_secret.is_empty());

    let read = h.service.read_access_token(&token.token_value).await.unwrap();
    assert_eq!(
        read.refresh_token.map(|r| r.token_value),
        token.refresh_token.map(|r| r.token_value)
    );
}

#[tokio::test]
async fn memory_store_reuses_token_within_session() {
    let h = harness(TokenStoreKind::Memory);
    let client = client(&h).await;

    let first = h
        .full
        .grant(PASSWORD_GRANT, &client, &password_params("123456"))
        .await
        .unwrap();
    let second = h
        .full
        .grant(PASSWORD_GRANT, &client, &password_params("123456"))
        .await
        .unwrap();
    assert_eq!(first.token_value, second.token_value);
}

#[tokio::test]
async fn refresh_grant_rotates_access_token() {
    let h = harness(TokenStoreKind::Memory);
    let client = client(&h).await;

    let first = h
        .full
        .grant(PASSWORD_GRANT, &client, &password_params("123456"))
        .await
        .unwrap();
    let refresh = first.refresh_token.clone().unwrap();

    let params = GrantParams::new().with("refresh_token", refresh.token_value.clone());
    let second = h
        .full
        .grant(REFRESH_TOKEN_GRANT, &client, &params)
        .await
        .unwrap();

    assert_ne!(first.token_value, second.token_value);
    assert_eq!(
        second.refresh_token.clone().unwrap().token_value,
        refresh.token_value
    );
    assert!(
        h.service
            .get_authorization_context(&second.token_value)
            .await
            .is_ok()
    );

    // The refreshed token is now the one a repeated grant reuses.
    let third = h
        .full
        .grant(PASSWORD_GRANT, &client, &password_params("123456"))
        .await
        .unwrap();
    assert_eq!(third.token_value, second.token_value);
}

#[tokio::test]
async fn memory_store_accepts_token_signed_by_another_instance() {
    let issuer = harness(TokenStoreKind::Memory);
    let token = issuer
        .full
        .grant(PASSWORD_GRANT, &client(&issuer).await, &password_params("123456"))
        .await
        .unwrap();

    let other = harness(TokenStoreKind::Memory);
    let context = other
        .service
        .get_authorization_context(&token.token_value)
        .await
        .unwrap();
    assert_eq!(context.user.username, "admin");

    let params = GrantParams::new().with(
        "refresh_token",
        token.refresh_token.unwrap().token_value,
    );
    let refreshed = other
        .full
        .grant(REFRESH_TOKEN_GRANT, &client(&other).await, &params)
        .await
        .unwrap();
    assert_ne!(refreshed.token_value, token.token_value);
}

#[tokio::test]
async fn endpoints_with_builders() {
    let h = harness(TokenStoreKind::Stateless);
    let client_builder = ClientAuthBuilder::new(h.clients.clone());
    let resource_builder = ResourceAuthBuilder::new(h.service.clone());

    // "clientId:clientSecret"
    let basic = "Basic Y2xpZW50SWQ6Y2xpZW50U2VjcmV0";

    let request = TokenRequest {
        grant_type: PASSWORD_GRANT.to_string(),
        params: password_params("123456"),
    };
    let token = token_endpoint(&h.full, client_builder.build(Some(basic)).await, &request)
        .await
        .unwrap();

    let check = CheckTokenRequest {
        token_value: token.token_value.clone(),
    };
    let context = check_token_endpoint(&h.service, client_builder.build(Some(basic)).await, &check)
        .await
        .unwrap();
    assert_eq!(context.user.username, "admin");

    let bearer = format!("Bearer {}", token.token_value);
    let scope = resource_builder.build(Some(&bearer)).await;
    assert!(scope.is_resolved());
    assert_eq!(
        simple_data(scope).unwrap(),
        "hello admin ,simple data, with simple authority"
    );

    let scope: RequestScope<_> = resource_builder.build(Some("Bearer not-a-token")).await;
    assert_eq!(simple_data(scope), Err(AuthError::InvalidTokenRequest));
}
