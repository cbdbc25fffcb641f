//! HTTP layer: request context, policy enforcement and error mapping

pub mod login;
pub mod oauth;

use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

use crate::auth::credentials::CredentialAuthenticator;
use crate::auth::federated::FederatedLoginHandler;
use crate::auth::keys::KeyMaterial;
use crate::auth::password::PasswordEncoder;
use crate::auth::policy::AccessPolicy;
use crate::auth::tokens::{extract_bearer_token, RequestPrincipal, TokenIssuer, TokenValidator};
use crate::error::AllServeError;
use crate::storage::UserDirectory;

/// Everything a request handler needs, threaded explicitly through warp
/// filters. No ambient or global authentication state.
#[derive(Clone)]
pub struct AuthContext {
    pub directory: Arc<dyn UserDirectory>,
    pub encoder: Arc<dyn PasswordEncoder>,
    pub key_material: Arc<KeyMaterial>,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub policy: Arc<AccessPolicy>,
    pub dashboard_url: String,
}

impl AuthContext {
    pub fn credential_authenticator(&self) -> CredentialAuthenticator {
        CredentialAuthenticator::new(self.directory.clone(), self.encoder.clone())
    }

    pub fn federated_handler(&self) -> FederatedLoginHandler {
        FederatedLoginHandler::new(self.directory.clone(), self.encoder.clone())
    }

    /// Validate an optional Authorization header into an optional principal.
    /// Invalid tokens yield no principal rather than an error here; the
    /// policy or the endpoint decides whether that matters.
    pub fn principal_from_header(&self, auth_header: Option<&str>) -> Option<RequestPrincipal> {
        auth_header
            .and_then(extract_bearer_token)
            .and_then(|token| self.validator.validate(&token).ok())
    }
}

/// Helper to include the context in a filter chain
pub fn with_context(
    ctx: AuthContext,
) -> impl Filter<Extract = (AuthContext,), Error = Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}

/// Map a core error onto the response status taxonomy. Authentication and
/// token failures are indistinguishable 401s; insufficient authority is a
/// distinct 403; a persisting provisioning race is transient.
pub fn error_status(err: &AllServeError) -> StatusCode {
    match err {
        AllServeError::InvalidCredentials
        | AllServeError::TokenExpired
        | AllServeError::TokenInvalidSignature
        | AllServeError::TokenMalformed(_) => StatusCode::UNAUTHORIZED,
        AllServeError::AccessDenied => StatusCode::FORBIDDEN,
        AllServeError::ProvisioningConflict(_) => StatusCode::SERVICE_UNAVAILABLE,
        AllServeError::StorageError(_)
        | AllServeError::KeyMaterial(_)
        | AllServeError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body with the mapped status
pub fn error_reply(err: &AllServeError) -> warp::reply::Response {
    let body = warp::reply::json(&serde_json::json!({ "error": err.to_string() }));
    warp::reply::with_status(body, error_status(err)).into_response()
}

/// Rejection carrying a policy decision
#[derive(Debug)]
struct PolicyDenied {
    status: StatusCode,
    message: String,
}

impl warp::reject::Reject for PolicyDenied {}

/// Filter that consults the access policy before any handler runs. The
/// request principal, when present, comes from the bearer token; the policy
/// decides whether its absence or its authority is acceptable for the path.
pub fn enforce_policy(
    ctx: AuthContext,
) -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::path::full()
        .and(warp::header::optional::<String>("authorization"))
        .and_then(move |path: FullPath, auth: Option<String>| {
            let ctx = ctx.clone();
            async move {
                let principal = ctx.principal_from_header(auth.as_deref());
                match ctx.policy.decide(path.as_str(), principal.as_ref()) {
                    Ok(()) => Ok(()),
                    Err(e) => Err(warp::reject::custom(PolicyDenied {
                        status: error_status(&e),
                        message: e.to_string(),
                    })),
                }
            }
        })
        .untuple_one()
}

/// Turn rejections (policy denials included) into JSON responses
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(denied) = err.find::<PolicyDenied>() {
        (denied.status, denied.message.clone())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else {
        (StatusCode::BAD_REQUEST, "Bad request".to_string())
    };

    let body = warp::reply::json(&serde_json::json!({ "error": message }));
    Ok(warp::reply::with_status(body, status))
}
