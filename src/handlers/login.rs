//! Login routes: the local form flow and the federated assertion hook

use serde::Deserialize;
use std::convert::Infallible;
use warp::http::Uri;
use warp::{Filter, Rejection, Reply};

use super::oauth::TokenResponse;
use super::{error_reply, with_context, AuthContext};

/// Local login form body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// A federated identity assertion, already verified upstream by the identity
/// provider integration. Only the fields the linking step needs.
#[derive(Debug, Deserialize)]
pub struct FederatedAssertion {
    pub email: String,
    pub name: String,
}

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>AllServe - Login</title></head>
<body>
  <h1>AllServe</h1>
  <form method="post" action="/login">
    <label>Login <input type="text" name="username" autocomplete="username"></label>
    <label>Senha <input type="password" name="password" autocomplete="current-password"></label>
    <button type="submit">Entrar</button>
  </form>
</body>
</html>
"#;

/// GET /login
async fn login_page(_ctx: AuthContext) -> Result<warp::reply::Response, Infallible> {
    Ok(warp::reply::html(LOGIN_PAGE).into_response())
}

/// POST /login — form credentials; success lands on the configured dashboard.
async fn login_submit(
    ctx: AuthContext,
    form: LoginForm,
) -> Result<warp::reply::Response, Infallible> {
    match ctx
        .credential_authenticator()
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(_principal) => Ok(dashboard_redirect(&ctx)),
        Err(e) => Ok(error_reply(&e)),
    }
}

/// POST /login/federated — the success-handler hook for federated logins.
/// Links or auto-provisions by email, then answers with a token pair.
async fn federated_login(
    ctx: AuthContext,
    assertion: FederatedAssertion,
) -> Result<warp::reply::Response, Infallible> {
    let principal = match ctx
        .federated_handler()
        .handle(&assertion.email, &assertion.name)
        .await
    {
        Ok(principal) => principal,
        Err(e) => return Ok(error_reply(&e)),
    };

    match ctx.issuer.issue(&principal) {
        Ok(pair) => Ok(warp::reply::json(&TokenResponse::from(pair)).into_response()),
        Err(e) => Ok(error_reply(&e)),
    }
}

fn dashboard_redirect(ctx: &AuthContext) -> warp::reply::Response {
    match ctx.dashboard_url.parse::<Uri>() {
        Ok(uri) => warp::redirect::see_other(uri).into_response(),
        Err(_) => warp::redirect::see_other(Uri::from_static("/")).into_response(),
    }
}

/// All /login routes
pub fn routes(
    ctx: AuthContext,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let page = warp::path!("login")
        .and(warp::get())
        .and(with_context(ctx.clone()))
        .and_then(login_page);

    let submit = warp::path!("login")
        .and(warp::post())
        .and(with_context(ctx.clone()))
        .and(warp::body::form::<LoginForm>())
        .and_then(login_submit);

    let federated = warp::path!("login" / "federated")
        .and(warp::post())
        .and(with_context(ctx))
        .and(warp::body::json::<FederatedAssertion>())
        .and_then(federated_login);

    page.or(submit).or(federated)
}
