//! `/oauth2/*` endpoints
//!
//! The endpoint paths are part of the contract other clients depend on:
//! token, introspect, revoke, authorize, userinfo, jwks, logout.

use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use uuid::Uuid;
use warp::http::{StatusCode, Uri};
use warp::{Filter, Rejection, Reply};

use super::{error_reply, with_context, AuthContext};
use crate::auth::claims::TokenKind;
use crate::auth::tokens::TokenPair;
use crate::auth::user::Principal;
use crate::error::{AllServeError, Result as CoreResult};

/// Standard token endpoint response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer",
            expires_in: pair.expires_in,
        }
    }
}

fn bad_request(message: &str) -> warp::reply::Response {
    let body = warp::reply::json(&serde_json::json!({ "error": message }));
    warp::reply::with_status(body, StatusCode::BAD_REQUEST).into_response()
}

/// POST /oauth2/token
async fn token_grant(
    ctx: AuthContext,
    form: HashMap<String, String>,
) -> Result<warp::reply::Response, Infallible> {
    let outcome = match form.get("grant_type").map(String::as_str) {
        Some("password") => {
            let (username, password) = match (form.get("username"), form.get("password")) {
                (Some(u), Some(p)) => (u, p),
                _ => return Ok(bad_request("username and password are required")),
            };
            password_grant(&ctx, username, password).await
        }
        Some("refresh_token") => match form.get("refresh_token") {
            Some(token) => refresh_grant(&ctx, token).await,
            None => return Ok(bad_request("refresh_token is required")),
        },
        _ => return Ok(bad_request("unsupported grant_type")),
    };

    Ok(match outcome {
        Ok(pair) => warp::reply::json(&TokenResponse::from(pair)).into_response(),
        Err(e) => error_reply(&e),
    })
}

async fn password_grant(ctx: &AuthContext, username: &str, password: &str) -> CoreResult<TokenPair> {
    let principal = ctx
        .credential_authenticator()
        .authenticate(username, password)
        .await?;
    ctx.issuer.issue(&principal)
}

/// Refresh exchange: the presented token must verify, be a refresh token and
/// still map to a persisted user. The new access token's claims come from the
/// freshly loaded user, not from the stale pair.
async fn refresh_grant(ctx: &AuthContext, token: &str) -> CoreResult<TokenPair> {
    let presented = ctx.validator.validate(token)?;
    if presented.kind() != TokenKind::Refresh {
        return Err(AllServeError::InvalidCredentials);
    }

    let user_id = Uuid::parse_str(presented.user_id())
        .map_err(|e| AllServeError::TokenMalformed(format!("bad subject: {}", e)))?;

    let user = ctx
        .directory
        .find_by_id(user_id)
        .await?
        .ok_or(AllServeError::InvalidCredentials)?;

    ctx.issuer.issue(&Principal::new(user))
}

/// POST /oauth2/introspect — RFC 7662 shape: a bad token is `active: false`,
/// never an error.
async fn introspect(
    ctx: AuthContext,
    form: HashMap<String, String>,
) -> Result<warp::reply::Response, Infallible> {
    let token = match form.get("token") {
        Some(token) => token,
        None => return Ok(bad_request("token is required")),
    };

    let body = match ctx.validator.validate(token) {
        Ok(principal) => {
            let mut value = serde_json::to_value(principal.claims())
                .unwrap_or_else(|_| serde_json::json!({}));
            if let Some(map) = value.as_object_mut() {
                map.insert("active".to_string(), serde_json::Value::Bool(true));
            }
            value
        }
        Err(_) => serde_json::json!({ "active": false }),
    };

    Ok(warp::reply::json(&body).into_response())
}

/// POST /oauth2/revoke — acknowledged statelessly; tokens expire on their own.
async fn revoke(
    _ctx: AuthContext,
    _form: HashMap<String, String>,
) -> Result<warp::reply::Response, Infallible> {
    Ok(warp::reply::with_status(warp::reply::json(&serde_json::json!({})), StatusCode::OK)
        .into_response())
}

/// GET /oauth2/userinfo
async fn userinfo(
    ctx: AuthContext,
    auth_header: Option<String>,
) -> Result<warp::reply::Response, Infallible> {
    let principal = match ctx.principal_from_header(auth_header.as_deref()) {
        Some(p) if p.kind() == TokenKind::Access => p,
        _ => return Ok(error_reply(&AllServeError::InvalidCredentials)),
    };

    Ok(warp::reply::json(principal.claims()).into_response())
}

/// GET /oauth2/jwks
async fn jwks(ctx: AuthContext) -> Result<warp::reply::Response, Infallible> {
    Ok(warp::reply::json(&ctx.key_material.jwk_set()).into_response())
}

/// GET /oauth2/authorize — entry point for browser flows; sends the client
/// to the login page.
async fn authorize(_ctx: AuthContext) -> Result<warp::reply::Response, Infallible> {
    Ok(warp::redirect::see_other(Uri::from_static("/login")).into_response())
}

/// GET /oauth2/logout — stateless; nothing to tear down server-side.
async fn logout(_ctx: AuthContext) -> Result<warp::reply::Response, Infallible> {
    Ok(warp::redirect::see_other(Uri::from_static("/login")).into_response())
}

/// All /oauth2 routes
pub fn routes(
    ctx: AuthContext,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let token_route = warp::path!("oauth2" / "token")
        .and(warp::post())
        .and(with_context(ctx.clone()))
        .and(warp::body::form::<HashMap<String, String>>())
        .and_then(token_grant);

    let introspect_route = warp::path!("oauth2" / "introspect")
        .and(warp::post())
        .and(with_context(ctx.clone()))
        .and(warp::body::form::<HashMap<String, String>>())
        .and_then(introspect);

    let revoke_route = warp::path!("oauth2" / "revoke")
        .and(warp::post())
        .and(with_context(ctx.clone()))
        .and(warp::body::form::<HashMap<String, String>>())
        .and_then(revoke);

    let userinfo_route = warp::path!("oauth2" / "userinfo")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and(warp::header::optional::<String>("authorization"))
        .and_then(userinfo);

    let jwks_route = warp::path!("oauth2" / "jwks")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(jwks);

    let authorize_route = warp::path!("oauth2" / "authorize")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(authorize);

    let logout_route = warp::path!("oauth2" / "logout")
        .and(warp::get())
        .and(with_context(ctx))
        .and_then(logout);

    token_route
        .or(introspect_route)
        .or(revoke_route)
        .or(userinfo_route)
        .or(jwks_route)
        .or(authorize_route)
        .or(logout_route)
}
