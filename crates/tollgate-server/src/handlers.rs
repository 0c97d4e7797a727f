//! HTTP handlers adapting requests to the core endpoints.

use std::collections::HashMap;

use axum::{
    Form, Json,
    extract::{Query, State, rejection::FormRejection},
};
use serde::Deserialize;
use tollgate_auth::AuthError;
use tollgate_auth::endpoint::{
    CheckTokenRequest, CheckTokenResponse, HealthResponse, SimpleResponse, TokenRequest,
    TokenResponse, check_token_endpoint, health_endpoint, simple_data, token_endpoint,
};

use crate::error::ApiError;
use crate::extractors::{BearerAuth, ClientAuth};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(alias = "grantType")]
    pub grant_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckTokenQuery {
    #[serde(alias = "tokenValue")]
    pub token: Option<String>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(health_endpoint())
}

/// `POST /oauth/token?grant_type=...` with credentials in a form body.
pub async fn token(
    State(state): State<AppState>,
    ClientAuth(client): ClientAuth,
    Query(query): Query<TokenQuery>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let params = match form {
        Ok(Form(params)) => params,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Token request body is not a form");
            return Err(ApiError(AuthError::InvalidTokenRequest));
        }
    };
    let request = TokenRequest {
        grant_type: query.grant_type.unwrap_or_default(),
        params: params.into(),
    };

    let token = token_endpoint(state.granter.as_ref(), client, &request).await?;

    tracing::info!(grant_type = %request.grant_type, "Token issued");
    Ok(Json(TokenResponse::from(Ok(token))))
}

/// `POST /oauth/check_token?token=...`
pub async fn check_token(
    State(state): State<AppState>,
    ClientAuth(client): ClientAuth,
    Query(query): Query<CheckTokenQuery>,
) -> Result<Json<CheckTokenResponse>, ApiError> {
    let request = CheckTokenRequest {
        token_value: query.token.unwrap_or_default(),
    };

    let context = check_token_endpoint(&state.token_service, client, &request).await?;
    Ok(Json(CheckTokenResponse::from(Ok(context))))
}

/// `GET /simple`, a sample resource protected by a bearer token.
pub async fn simple(BearerAuth(context): BearerAuth) -> Result<Json<SimpleResponse>, ApiError> {
    let result = simple_data(context)?;
    Ok(Json(SimpleResponse::from(Ok(result))))
}
